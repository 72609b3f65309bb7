// src/services/certificate.rs

use chrono::{DateTime, NaiveDate, Utc};
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::{
    config::PASSING_SCORE_PERCENTAGE,
    error::QuizError,
    models::session::ReviewItem,
    services::{
        quiz_session::SessionState,
        results::{incorrect_questions, review_items, review_topics, summarize},
    },
};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const PT_TO_MM: f32 = 0.3528;

/// Everything printed on a certificate.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateData {
    pub player_name: String,
    pub score: usize,
    pub total: usize,
    pub percent: u32,
    pub duration: u64,
    pub date: NaiveDate,
    pub incorrect: Vec<ReviewItem>,
    pub review_topics: Vec<String>,
}

impl CertificateData {
    pub fn from_session(session: &SessionState, now: DateTime<Utc>) -> Self {
        let summary = summarize(session, now);
        let incorrect = incorrect_questions(session);

        Self {
            player_name: session.player_name().to_string(),
            score: summary.score,
            total: summary.total,
            percent: summary.percent,
            duration: summary.duration,
            date: now.date_naive(),
            incorrect: review_items(&incorrect),
            review_topics: review_topics(&incorrect),
        }
    }

    pub fn passed(&self) -> bool {
        self.percent >= PASSING_SCORE_PERCENTAGE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Heading,
    Body,
    Blank,
}

impl LineStyle {
    fn font_size(self) -> f32 {
        match self {
            LineStyle::Title => 22.0,
            LineStyle::Heading => 14.0,
            LineStyle::Body | LineStyle::Blank => 11.0,
        }
    }

    fn line_height_mm(self) -> f32 {
        self.font_size() * PT_TO_MM * 1.5
    }

    /// Rough character budget per line for Helvetica at this size.
    fn max_chars(self) -> usize {
        let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        (usable / (self.font_size() * PT_TO_MM * 0.5)) as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub style: LineStyle,
}

impl Line {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn blank() -> Self {
        Self::new("", LineStyle::Blank)
    }
}

/// Greedy word wrap; words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: String = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            lines.push(head);
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn push_wrapped(lines: &mut Vec<Line>, text: &str, style: LineStyle) {
    for chunk in wrap_text(text, style.max_chars()) {
        lines.push(Line::new(chunk, style));
    }
}

/// Certificate content, top to bottom, already wrapped.
pub fn certificate_lines(data: &CertificateData) -> Vec<Line> {
    let mut lines = vec![
        Line::new("AML Mastermind Certificate", LineStyle::Title),
        Line::blank(),
    ];
    push_wrapped(&mut lines, &format!("Awarded to: {}", data.player_name), LineStyle::Heading);
    lines.push(Line::new(
        format!("Score: {}/{} ({}%)", data.score, data.total, data.percent),
        LineStyle::Body,
    ));
    lines.push(Line::new(
        format!("Time taken: {} seconds", data.duration),
        LineStyle::Body,
    ));
    lines.push(Line::new(
        format!("Date: {}", data.date.format("%Y-%m-%d")),
        LineStyle::Body,
    ));
    lines.push(Line::blank());

    if data.passed() {
        push_wrapped(
            &mut lines,
            "Congratulations! You have demonstrated a strong understanding of anti-money laundering principles.",
            LineStyle::Heading,
        );
        return lines;
    }

    lines.push(Line::new("Questions to review", LineStyle::Heading));
    for (n, item) in data.incorrect.iter().enumerate() {
        push_wrapped(&mut lines, &format!("{}. {}", n + 1, item.question), LineStyle::Body);
        push_wrapped(&mut lines, &format!("Correct answer: {}", item.correct_answer), LineStyle::Body);
        if !item.explanation.is_empty() {
            push_wrapped(&mut lines, &format!("Explanation: {}", item.explanation), LineStyle::Body);
        }
        lines.push(Line::blank());
    }

    if !data.review_topics.is_empty() {
        lines.push(Line::new("Suggested topics to review", LineStyle::Heading));
        for topic in &data.review_topics {
            push_wrapped(&mut lines, &format!("- {}", topic), LineStyle::Body);
        }
    }
    lines
}

/// Splits lines into pages, each line paired with its baseline in mm from the bottom.
pub fn paginate(lines: Vec<Line>) -> Vec<Vec<(Line, f32)>> {
    let top = PAGE_HEIGHT_MM - MARGIN_MM;
    let mut pages = vec![Vec::new()];
    let mut y = top;

    for line in lines {
        let height = line.style.line_height_mm();
        if y - height < MARGIN_MM {
            pages.push(Vec::new());
            y = top;
        }
        y -= height;
        if let Some(page) = pages.last_mut() {
            page.push((line, y));
        }
    }
    pages
}

/// Renders the certificate as PDF bytes.
pub fn render_pdf(data: &CertificateData) -> Result<Vec<u8>, QuizError> {
    let pages = paginate(certificate_lines(data));

    let (doc, first_page, first_layer) = PdfDocument::new(
        "AML Mastermind Certificate",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| QuizError::Render(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| QuizError::Render(e.to_string()))?;

    for (n, page) in pages.iter().enumerate() {
        let layer = if n == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_ref, layer_ref) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page_ref).get_layer(layer_ref)
        };

        for (line, y) in page {
            if line.style == LineStyle::Blank {
                continue;
            }
            let font = match line.style {
                LineStyle::Title | LineStyle::Heading => &bold,
                _ => &regular,
            };
            layer.use_text(
                line.text.clone(),
                line.style.font_size(),
                Mm(MARGIN_MM),
                Mm(*y),
                font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| QuizError::Render(e.to_string()))
}
