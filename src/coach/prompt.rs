//! Prompt 构造：系统指令与历史扁平化
//!
//! 对话历史被压成单段文本（逐条加角色前缀、空行分隔），连同固定系统指令一起
//! 发给生成端点。这是单向有损转换，不向服务商发送结构化消息数组。

use crate::chat::{Role, Turn};

/// FitCoach 人设与回答守则（固定系统指令）
pub const SYSTEM_INSTRUCTION: &str = "You are FitCoach AI, a world-class personal fitness coach and nutritionist. You are passionate, motivating, and deeply knowledgeable about exercise science, nutrition, and healthy living.

Your personality:
- Energetic and encouraging, like a supportive personal trainer
- You use empowering language and celebrate user efforts
- You give concise, actionable advice
- You ask follow-up questions when more context would help

Your expertise covers:
- Workout programming (strength, cardio, flexibility, HIIT, calisthenics)
- Nutrition and meal planning (macros, meal prep, dietary restrictions)
- Weight management (fat loss, muscle gain, body recomposition)
- Recovery (stretching, sleep, rest days, injury prevention)
- Habit building and motivation
- Beginner to advanced fitness levels

Guidelines:
- Always prioritize safety. If someone describes pain or injury, recommend consulting a medical professional.
- Tailor advice to the user's stated fitness level, goals, and limitations.
- Use bullet points and clear formatting for workout plans and meal suggestions.
- Keep responses focused and avoid unnecessary filler.
- If asked about topics outside fitness and nutrition, politely redirect the conversation back to health and wellness.";

/// 将历史扁平化为单段 Prompt：每条前缀 "User:"/"Coach:"，空行分隔，保持原序
pub fn flatten_history(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| {
            let label = match t.role {
                Role::User => "User",
                Role::Assistant => "Coach",
            };
            format!("{}: {}", label, t.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Turn;

    #[test]
    fn test_flatten_labels_and_order() {
        let turns = vec![
            Turn::user("I want to lose weight"),
            Turn::assistant("Great goal! Let's start."),
            Turn::user("What about cardio?"),
        ];
        let prompt = flatten_history(&turns);
        assert_eq!(
            prompt,
            "User: I want to lose weight\n\nCoach: Great goal! Let's start.\n\nUser: What about cardio?"
        );
    }

    #[test]
    fn test_flatten_segment_count_matches_history_len() {
        let turns: Vec<Turn> = (0..7)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!("q{}", i))
                } else {
                    Turn::assistant(format!("a{}", i))
                }
            })
            .collect();
        let prompt = flatten_history(&turns);
        assert_eq!(prompt.split("\n\n").count(), turns.len());
        // 每段都带角色前缀
        for segment in prompt.split("\n\n") {
            assert!(segment.starts_with("User: ") || segment.starts_with("Coach: "));
        }
    }

    #[test]
    fn test_flatten_single_turn_has_no_separator() {
        let prompt = flatten_history(&[Turn::user("hello")]);
        assert_eq!(prompt, "User: hello");
    }
}
