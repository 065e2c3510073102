use super::help_line;
use crate::app::App;
use crate::glyphs;
use crate::models::Question;
use crate::session::AnswerOutcome;
use crate::store::AccountStore;
use crate::ui::layout::calculate_quiz_chunks;
use crate::utils::pad_to_width;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Entries shown in a full legend at most.
const FULL_LEGEND_LIMIT: usize = 15;
const LEGEND_CELL_WIDTH: usize = 12;
const GLYPH_CELL_WIDTH: usize = 7;

/// How much help the legend gives, shrinking as the quiz goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendKind {
    /// The signs for the values in the current question.
    Full,
    /// Every sign from 1 to 19.
    OneToNineteen,
    None,
}

/// Legend for the 1-based `question_number`.
pub fn legend_kind(question_number: usize) -> LegendKind {
    match question_number {
        0..=4 => LegendKind::Full,
        5..=8 => LegendKind::OneToNineteen,
        _ => LegendKind::None,
    }
}

pub fn legend_values(question: &Question, kind: LegendKind) -> Vec<u32> {
    match kind {
        LegendKind::Full => {
            let mut values: Vec<u32> = [question.operand1, question.operand2, question.result]
                .into_iter()
                .chain(question.options.iter().copied())
                .filter(|v| glyphs::is_representable(*v))
                .collect();
            values.sort_unstable();
            values.dedup();
            values.truncate(FULL_LEGEND_LIMIT);
            values
        }
        LegendKind::OneToNineteen => (1..=19).collect(),
        LegendKind::None => Vec::new(),
    }
}

/// Full legends show the signs alone. The 1-19 legend pairs each sign with
/// its number.
fn legend_cell(value: u32, kind: LegendKind) -> String {
    match kind {
        LegendKind::Full => glyphs::render(value).into_owned(),
        _ => format!("{} = {}", glyphs::render(value), value),
    }
}

fn legend_text(values: &[u32], kind: LegendKind, width: u16) -> Text<'static> {
    let cell_width = match kind {
        LegendKind::Full => GLYPH_CELL_WIDTH,
        _ => LEGEND_CELL_WIDTH,
    };
    let per_row = (usize::from(width.saturating_sub(2)) / cell_width).max(1);
    let mut text = Text::default();
    for row in values.chunks(per_row) {
        let cells: String = row
            .iter()
            .map(|v| pad_to_width(&legend_cell(*v, kind), cell_width))
            .collect();
        text.push_line(Line::from(cells));
    }
    text
}

fn feedback_line(outcome: &AnswerOutcome) -> Line<'static> {
    if outcome.correct {
        Line::from(Span::styled(
            "🎉 Correto! Muito bem!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            format!(
                "❌ Resposta incorreta. A resposta correta era {}.",
                outcome.expected
            ),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    }
}

pub fn draw_quiz<S: AccountStore>(f: &mut Frame, app: &App<S>) {
    let Some(quiz) = app.quiz.as_ref() else {
        return;
    };
    let Ok(question) = quiz.current_question() else {
        return;
    };
    let layout = calculate_quiz_chunks(f.area());
    let number = quiz.current_index() + 1;
    let total = quiz.questions().len();
    let score = quiz.score();

    let name = app.user.as_ref().map(|u| u.name.as_str()).unwrap_or("");
    let tier = question.tier.map(|t| format!(" ({})", t.label())).unwrap_or_default();
    let header = Paragraph::new(format!(
        "{}  |  Questão {} / {}  |  {}{}  |  Acertos: {}",
        name,
        number,
        total,
        question.operation.display_name(),
        tier,
        score.correct
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let mut question_text = Text::default();
    question_text.push_line(Line::from(""));
    question_text.push_line(Line::from(Span::styled(
        format!(
            "{}   {}   {}   =   ?",
            question.glyphs.operand1,
            question.operation.symbol(),
            question.glyphs.operand2
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    let question_widget = Paragraph::new(question_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Resolva a operação"),
        );
    f.render_widget(question_widget, layout.question_area);

    let kind = legend_kind(number);
    let legend_title = match kind {
        LegendKind::Full => "📚 Legenda: Sinais LIBRAS",
        LegendKind::OneToNineteen => "📚 Legenda: Sinais LIBRAS (1-19)",
        LegendKind::None => "Sem legenda",
    };
    let legend = Paragraph::new(legend_text(
        &legend_values(question, kind),
        kind,
        layout.legend_area.width,
    ))
    .wrap(Wrap { trim: false })
    .block(Block::default().borders(Borders::ALL).title(legend_title));
    f.render_widget(legend, layout.legend_area);

    let option_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, question.options.len().max(1) as u32);
            question.options.len()
        ])
        .split(layout.options_area);
    for (i, (option, area)) in question.options.iter().zip(option_areas.iter()).enumerate() {
        let selected = i == app.selected_option;
        let style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Magenta)
        };
        let widget = Paragraph::new(format!("{}  {}", i + 1, glyphs::render(*option)))
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(widget, *area);
    }

    let feedback = match &app.last_outcome {
        Some(outcome) => Paragraph::new(feedback_line(outcome)),
        None => Paragraph::new("Escolha a resposta correta"),
    };
    f.render_widget(
        feedback
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        layout.feedback_area,
    );

    let help = Paragraph::new(help_line(&[
        ("1-4", "Responder"),
        ("←/→", "Selecionar"),
        ("Enter", "Confirmar"),
        ("Esc", "Sair"),
        ("Ctrl+C", "Fechar"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Sair do quiz")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Deseja sair? O progresso deste quiz será perdido.")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Sim (sair)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" Não (continuar)  "),
        Span::styled(
            "Ctrl+C",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Fechar"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OperandGlyphs, Operation};

    fn question() -> Question {
        Question {
            id: 1,
            operation: Operation::Addition,
            operand1: 5,
            operand2: 30,
            result: 35,
            options: vec![35, 3, 5, 40],
            glyphs: OperandGlyphs::for_operands(5, 30),
            tier: None,
        }
    }

    #[test]
    fn test_legend_shrinks_as_quiz_progresses() {
        assert_eq!(legend_kind(1), LegendKind::Full);
        assert_eq!(legend_kind(4), LegendKind::Full);
        assert_eq!(legend_kind(5), LegendKind::OneToNineteen);
        assert_eq!(legend_kind(8), LegendKind::OneToNineteen);
        assert_eq!(legend_kind(9), LegendKind::None);
        assert_eq!(legend_kind(12), LegendKind::None);
    }

    #[test]
    fn test_full_legend_lists_question_signs_once() {
        assert_eq!(legend_values(&question(), LegendKind::Full), vec![3, 5]);
    }

    #[test]
    fn test_partial_legend_is_one_to_nineteen() {
        let values = legend_values(&question(), LegendKind::OneToNineteen);
        assert_eq!(values.len(), 19);
        assert_eq!(values.first(), Some(&1));
        assert_eq!(values.last(), Some(&19));
        assert!(legend_values(&question(), LegendKind::None).is_empty());
    }

    #[test]
    fn test_legend_text_wraps_by_width() {
        let values: Vec<u32> = (1..=19).collect();
        // 50 columns fit four cells per row.
        assert_eq!(legend_text(&values, LegendKind::OneToNineteen, 50).lines.len(), 5);
        assert_eq!(legend_text(&values, LegendKind::OneToNineteen, 0).lines.len(), 19);
    }

    #[test]
    fn test_full_legend_hides_numbers() {
        let values = legend_values(&question(), LegendKind::Full);
        let text = legend_text(&values, LegendKind::Full, 80);
        let rendered: String = text
            .lines
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(rendered.contains(glyphs::render(3).as_ref()));
        assert!(rendered.contains(glyphs::render(5).as_ref()));
        assert!(!rendered.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_partial_legend_pairs_signs_with_numbers() {
        assert_eq!(legend_cell(3, LegendKind::OneToNineteen), format!("{} = 3", glyphs::render(3)));
        assert_eq!(legend_cell(3, LegendKind::Full), glyphs::render(3));
    }

    #[test]
    fn test_feedback_line_reports_correct_answer() {
        let outcome = AnswerOutcome {
            index: 0,
            given: 7,
            expected: 8,
            correct: false,
            complete: false,
        };
        let line = feedback_line(&outcome);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("correta era 8"));
    }
}
