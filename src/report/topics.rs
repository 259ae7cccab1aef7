//! 话题提取
//!
//! 对全部对话文本做大小写不敏感的子串扫描，命中固定的关键词→标签词典即记一个话题。
//! 标签去重，最多 8 个，按词典中首次命中的顺序排列。

use crate::chat::Turn;

/// 话题标签上限
pub const MAX_TOPICS: usize = 8;

/// 关键词→标签词典（顺序即输出顺序；diet/nutrition 共用一个标签）
const TOPIC_KEYWORDS: &[(&str, &str)] = &[
    ("workout", "Workout Plans"),
    ("exercise", "Exercise Routines"),
    ("cardio", "Cardio Training"),
    ("strength", "Strength Training"),
    ("weight", "Weight Management"),
    ("diet", "Diet & Nutrition"),
    ("nutrition", "Diet & Nutrition"),
    ("protein", "Protein & Macros"),
    ("meal", "Meal Planning"),
    ("stretch", "Stretching & Flexibility"),
    ("recovery", "Recovery"),
    ("sleep", "Sleep & Rest"),
    ("running", "Running"),
    ("yoga", "Yoga"),
    ("hiit", "HIIT Training"),
    ("abs", "Core Training"),
    ("muscle", "Muscle Building"),
    ("fat", "Fat Loss"),
    ("beginner", "Beginner Fitness"),
    ("motivation", "Motivation"),
    ("injury", "Injury Prevention"),
    ("flexibility", "Flexibility"),
    ("calorie", "Calorie Tracking"),
];

/// 扫描全部消息内容，返回命中的话题标签（去重、限量、保序）
pub fn extract_topics(turns: &[Turn]) -> Vec<&'static str> {
    let all_text = turns
        .iter()
        .map(|t| t.content.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut found: Vec<&'static str> = Vec::new();
    for &(keyword, label) in TOPIC_KEYWORDS {
        if all_text.contains(keyword) && !found.contains(&label) {
            found.push(label);
            if found.len() == MAX_TOPICS {
                break;
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Turn;

    #[test]
    fn test_case_insensitive_match() {
        let turns = vec![
            Turn::user("How much PROTEIN do I need?"),
            Turn::assistant("Also consider Yoga for recovery."),
        ];
        let topics = extract_topics(&turns);
        assert!(topics.contains(&"Protein & Macros"));
        assert!(topics.contains(&"Yoga"));
        assert!(topics.contains(&"Recovery"));
    }

    #[test]
    fn test_duplicate_label_counted_once() {
        // diet 与 nutrition 同标签，只出现一次
        let turns = vec![Turn::user("my diet and nutrition questions")];
        let topics = extract_topics(&turns);
        assert_eq!(
            topics.iter().filter(|t| **t == "Diet & Nutrition").count(),
            1
        );
    }

    #[test]
    fn test_capped_at_max_and_dictionary_order() {
        let everything = TOPIC_KEYWORDS
            .iter()
            .map(|(k, _)| *k)
            .collect::<Vec<_>>()
            .join(" ");
        let turns = vec![Turn::user(everything)];
        let topics = extract_topics(&turns);
        assert_eq!(topics.len(), MAX_TOPICS);
        // 前 8 个去重标签按词典顺序
        assert_eq!(
            topics,
            vec![
                "Workout Plans",
                "Exercise Routines",
                "Cardio Training",
                "Strength Training",
                "Weight Management",
                "Diet & Nutrition",
                "Protein & Macros",
                "Meal Planning",
            ]
        );
    }

    #[test]
    fn test_no_match_yields_empty() {
        let turns = vec![Turn::user("hello there")];
        assert!(extract_topics(&turns).is_empty());
    }
}
