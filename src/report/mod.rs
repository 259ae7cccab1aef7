//! 会话报告导出
//!
//! 将完整对话历史渲染为分页 PDF：横幅、会话统计、话题标签、逐条对话记录与页脚。
//! 纯同步确定性排版，输入是已校验的内存数据，无可恢复错误路径可言。

pub mod layout;
pub mod topics;

pub use layout::{render_report, save_report, ReportError};
pub use topics::{extract_topics, MAX_TOPICS};

use crate::chat::{Role, Turn};

/// 会话统计：总条数与用户/助手分项（分项之和恒等于总数）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionStats {
    pub total: usize,
    pub user: usize,
    pub assistant: usize,
}

impl SessionStats {
    pub fn from_turns(turns: &[Turn]) -> Self {
        let user = turns.iter().filter(|t| t.role == Role::User).count();
        Self {
            total: turns.len(),
            user,
            assistant: turns.len() - user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Turn;

    #[test]
    fn test_stats_subcounts_sum_to_total() {
        let turns = vec![
            Turn::user("a"),
            Turn::assistant("b"),
            Turn::user("c"),
            Turn::assistant("d"),
            Turn::user("e"),
        ];
        let stats = SessionStats::from_turns(&turns);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.user, 3);
        assert_eq!(stats.assistant, 2);
        assert_eq!(stats.user + stats.assistant, stats.total);
    }

    #[test]
    fn test_stats_empty() {
        let stats = SessionStats::from_turns(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.user, 0);
        assert_eq!(stats.assistant, 0);
    }
}
