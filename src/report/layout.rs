//! PDF 排版
//!
//! A4 纵向、自上而下游标式排版：剩余竖向空间不足时自动换页，续页带小标题，
//! 排版结束后统一补写每页页脚（页码）。内置 Helvetica 字体没有字宽度量，
//! 换行按内容宽度推出的字符预算做贪心折行。

use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

use chrono::Local;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rgb,
};
use thiserror::Error;

use crate::chat::{Role, Turn};
use crate::report::{extract_topics, SessionStats};

const PAGE_W: f64 = 210.0;
const PAGE_H: f64 = 297.0;
const MARGIN: f64 = 20.0;
const CONTENT_W: f64 = PAGE_W - MARGIN * 2.0;

/// 1pt = 0.3528mm；Helvetica 平均字宽约 0.5em
const MM_PER_PT: f64 = 0.3528;
const AVG_CHAR_EM: f64 = 0.5;

/// 报告导出错误
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f64 / 255.0,
        g as f64 / 255.0,
        b as f64 / 255.0,
        None,
    ))
}

/// 估算文本宽度（mm）；内置字体无度量，按平均字宽估
fn text_width_mm(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * MM_PER_PT * AVG_CHAR_EM
}

/// 指定字号下内容区能容纳的字符数
fn max_chars_for(font_size: f64, width_mm: f64) -> usize {
    (width_mm / (font_size * MM_PER_PT * AVG_CHAR_EM)).floor() as usize
}

/// 剔除不可打印与非 ASCII 字符，保留换行
fn sanitize(content: &str) -> String {
    content
        .chars()
        .filter(|c| ('\u{20}'..='\u{7e}').contains(c) || *c == '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

/// 贪心折行：按词累积到字符预算，超长单词硬切
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        if raw_line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            if !current.is_empty() && current.len() + 1 + word.len() <= max_chars {
                current.push(' ');
                current.push_str(word);
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            // 净化后内容为纯 ASCII，按字节切分安全
            let mut rest = word;
            while rest.len() > max_chars {
                let (head, tail) = rest.split_at(max_chars);
                lines.push(head.to_string());
                rest = tail;
            }
            current = rest.to_string();
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// 页面游标：持有文档与当前图层，y 为距页顶的毫米数
struct PageCursor {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    layer: PdfLayerReference,
    y: f64,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PageCursor {
    fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer_idx) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer_idx);
        Ok(Self {
            doc,
            pages: vec![(page, layer_idx)],
            layer,
            y: MARGIN,
            regular,
            bold,
        })
    }

    /// 竖向空间不足则翻页；续页带小标题行
    fn ensure_space(&mut self, needed: f64) {
        if self.y + needed > PAGE_H - MARGIN {
            let (page, layer_idx) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            self.pages.push((page, layer_idx));
            self.layer = self.doc.get_page(page).get_layer(layer_idx);

            self.text("FitCoach AI - Fitness Report", 8.0, MARGIN, 12.0, false, rgb(120, 120, 120));
            self.hline(MARGIN, PAGE_W - MARGIN, 14.0, 0.2, rgb(220, 220, 220));
            self.y = 22.0;
        }
    }

    /// 在距页顶 y_top 处写一行文本（PDF 坐标原点在左下，此处统一换算）
    fn text(&self, text: &str, size: f64, x: f64, y_top: f64, bold: bool, color: Color) {
        self.layer.set_fill_color(color);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size, Mm(x), Mm(PAGE_H - y_top), font);
    }

    /// 实心矩形，(x, y_top) 为左上角
    fn filled_rect(&self, x: f64, y_top: f64, w: f64, h: f64, color: Color) {
        self.layer.set_fill_color(color);
        let bottom = PAGE_H - (y_top + h);
        let top = PAGE_H - y_top;
        let shape = Line {
            points: vec![
                (Point::new(Mm(x), Mm(bottom)), false),
                (Point::new(Mm(x + w), Mm(bottom)), false),
                (Point::new(Mm(x + w), Mm(top)), false),
                (Point::new(Mm(x), Mm(top)), false),
            ],
            is_closed: true,
            has_fill: true,
            has_stroke: false,
            is_clockwise_winding: false,
        };
        self.layer.add_shape(shape);
    }

    /// 水平细线
    fn hline(&self, x1: f64, x2: f64, y_top: f64, thickness: f64, color: Color) {
        self.layer.set_outline_color(color);
        self.layer.set_outline_thickness(thickness);
        let shape = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(PAGE_H - y_top)), false),
                (Point::new(Mm(x2), Mm(PAGE_H - y_top)), false),
            ],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clockwise_winding: false,
        };
        self.layer.add_shape(shape);
    }

    /// 小节标题：主色标题 + 短下划线
    fn section_heading(&mut self, title: &str) {
        self.text(title, 14.0, MARGIN, self.y, true, rgb(16, 185, 129));
        self.y += 3.0;
        self.hline(MARGIN, MARGIN + 40.0, self.y, 0.5, rgb(16, 185, 129));
        self.y += 8.0;
    }
}

/// 将对话历史渲染为 PDF 字节
pub fn render_report(turns: &[Turn]) -> Result<Vec<u8>, ReportError> {
    let mut page = PageCursor::new("FitCoach AI - Fitness Report")?;

    // ===== 横幅 =====
    page.filled_rect(0.0, 0.0, PAGE_W, 45.0, rgb(16, 185, 129));
    page.filled_rect(0.0, 42.0, PAGE_W, 3.0, rgb(13, 148, 103));
    page.text("FitCoach AI", 24.0, MARGIN, 22.0, true, rgb(255, 255, 255));
    page.text("Personal Fitness Report", 11.0, MARGIN, 32.0, false, rgb(255, 255, 255));

    let date = Local::now().format("%A, %B %-d, %Y").to_string();
    let date_x = PAGE_W - MARGIN - text_width_mm(&date, 9.0);
    page.text(&date, 9.0, date_x, 32.0, false, rgb(255, 255, 255));

    page.y = 55.0;

    // ===== 会话统计 =====
    page.section_heading("Session Summary");

    let stats = SessionStats::from_turns(turns);
    let generated_at = Local::now().format("%H:%M:%S").to_string();
    let stat_lines = [
        format!("Total Messages: {}", stats.total),
        format!("Your Questions: {}", stats.user),
        format!("Coach Responses: {}", stats.assistant),
        format!("Report Generated: {}", generated_at),
    ];
    for stat in &stat_lines {
        page.text(
            &format!("-  {}", stat),
            10.0,
            MARGIN + 2.0,
            page.y,
            false,
            rgb(60, 60, 60),
        );
        page.y += 6.0;
    }
    page.y += 6.0;

    // ===== 话题标签 =====
    let topics = extract_topics(turns);
    if !topics.is_empty() {
        page.ensure_space(30.0);
        page.section_heading("Topics Discussed");

        for topic in &topics {
            page.ensure_space(8.0);
            let pill_w = text_width_mm(topic, 10.0) + 8.0;
            page.filled_rect(MARGIN + 2.0, page.y - 4.0, pill_w, 7.0, rgb(240, 253, 244));
            page.text(topic, 10.0, MARGIN + 6.0, page.y, false, rgb(16, 150, 110));
            page.y += 10.0;
        }
        page.y += 4.0;
    }

    // ===== 对话记录 =====
    page.ensure_space(20.0);
    page.section_heading("Conversation Log");
    page.y += 2.0;

    let content_budget = max_chars_for(10.0, CONTENT_W - 4.0);
    for turn in turns {
        let is_user = turn.role == Role::User;
        let label = if is_user { "YOU" } else { "FITCOACH AI" };
        let clean = sanitize(&turn.content);

        // 角色标签
        page.ensure_space(16.0);
        let label_w = text_width_mm(label, 8.0) + 8.0;
        if is_user {
            page.filled_rect(MARGIN, page.y - 4.0, label_w, 7.0, rgb(16, 185, 129));
            page.text(label, 8.0, MARGIN + 4.0, page.y, true, rgb(255, 255, 255));
        } else {
            page.filled_rect(MARGIN, page.y - 4.0, label_w, 7.0, rgb(243, 244, 246));
            page.text(label, 8.0, MARGIN + 4.0, page.y, true, rgb(55, 65, 81));
        }
        page.y += 8.0;

        // 消息正文
        for line in wrap_text(&clean, content_budget) {
            page.ensure_space(6.0);
            if !line.is_empty() {
                page.text(&line, 10.0, MARGIN + 2.0, page.y, false, rgb(50, 50, 50));
            }
            page.y += 5.0;
        }
        page.y += 6.0;

        // 消息间分隔线
        page.ensure_space(4.0);
        page.hline(MARGIN, PAGE_W - MARGIN, page.y, 0.2, rgb(230, 230, 230));
        page.y += 8.0;
    }

    // ===== 页脚（所有页统一补写页码）=====
    let total_pages = page.pages.len();
    for (i, (page_idx, layer_idx)) in page.pages.iter().enumerate() {
        let layer = page.doc.get_page(*page_idx).get_layer(*layer_idx);
        layer.set_fill_color(rgb(150, 150, 150));

        let branding = "Generated by FitCoach AI - Your Personal Fitness Coach";
        let branding_x = (PAGE_W - text_width_mm(branding, 8.0)) / 2.0;
        layer.use_text(branding, 8.0, Mm(branding_x), Mm(10.0), &page.regular);

        let page_label = format!("Page {} of {}", i + 1, total_pages);
        let label_x = PAGE_W - MARGIN - text_width_mm(&page_label, 8.0);
        layer.use_text(page_label, 8.0, Mm(label_x), Mm(10.0), &page.regular);
    }

    let mut writer = BufWriter::new(Cursor::new(Vec::new()));
    page.doc
        .save(&mut writer)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let cursor = writer
        .into_inner()
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// 渲染并保存到目标目录，文件名带当天日期：FitCoach_Report_YYYY-MM-DD.pdf
pub fn save_report(turns: &[Turn], dir: &Path) -> Result<PathBuf, ReportError> {
    let bytes = render_report(turns)?;
    let filename = format!("FitCoach_Report_{}.pdf", Local::now().format("%Y-%m-%d"));
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_non_ascii_keeps_newlines() {
        let cleaned = sanitize("  Drink 2L 水 of water\nevery day ✅  ");
        assert_eq!(cleaned, "Drink 2L  of water\nevery day");
    }

    #[test]
    fn test_wrap_respects_budget() {
        let lines = wrap_text("one two three four five six seven", 10);
        assert!(lines.iter().all(|l| l.len() <= 10));
        assert_eq!(lines.join(" "), "one two three four five six seven");
    }

    #[test]
    fn test_wrap_hard_splits_long_word() {
        let lines = wrap_text("abcdefghijklmnop", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "klmno", "p"]);
    }

    #[test]
    fn test_wrap_preserves_blank_lines() {
        let lines = wrap_text("para one\n\npara two", 20);
        assert_eq!(lines, vec!["para one", "", "para two"]);
    }

    #[test]
    fn test_char_budget_is_positive_for_content_width() {
        assert!(max_chars_for(10.0, CONTENT_W - 4.0) > 40);
    }
}
