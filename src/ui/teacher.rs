use super::help_line;
use crate::app::TeacherForm;
use crate::models::Operation;
use crate::ui::layout::calculate_form_chunks;
use crate::utils::truncate_string;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_teacher(f: &mut Frame, form: &TeacherForm) {
    let layout = calculate_form_chunks(f.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Painel do Professor",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Defina os intervalos de cada operação e gere 3 questões por operação"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(20)])
        .split(layout.body_area);

    let mut ranges_text = Text::default();
    for (op_index, operation) in Operation::ALL.iter().enumerate() {
        let mut spans = vec![Span::from(format!(
            "{:<14}",
            format!("{} ({})", operation.display_name(), operation.symbol())
        ))];
        for (offset, label) in [(0, "mín"), (1, "máx")] {
            let index = op_index * 2 + offset;
            let style = if index == form.focus {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::from(format!(" {} ", label)));
            spans.push(Span::styled(format!("[{:>4}]", form.inputs[index]), style));
        }
        ranges_text.push_line(Line::from(spans));
        ranges_text.push_line(Line::from(""));
    }
    let ranges = Paragraph::new(ranges_text)
        .block(Block::default().borders(Borders::ALL).title("Intervalos"));
    f.render_widget(ranges, columns[0]);

    let mut preview_text = Text::default();
    match &form.preview {
        Some(questions) => {
            let width = usize::from(columns[1].width.saturating_sub(2));
            for (i, q) in questions.iter().enumerate() {
                let line = format!("{:>2}. {}   opções: {:?}", i + 1, q.prompt(), q.options);
                preview_text.push_line(Line::from(truncate_string(&line, width)));
            }
        }
        None => preview_text.push_line(Line::from(Span::styled(
            "Pressione g para gerar as questões",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    let preview = Paragraph::new(preview_text)
        .block(Block::default().borders(Borders::ALL).title("Pré-visualização"));
    f.render_widget(preview, columns[1]);

    let message = match &form.error {
        Some(error) => Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
        None => Paragraph::new("Valores inválidos contam como 0; o mínimo efetivo é 1.")
            .style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(message.alignment(Alignment::Center), layout.message_area);

    let help = Paragraph::new(help_line(&[
        ("Tab", "Próximo campo"),
        ("g", "Gerar"),
        ("u", "Usar questões"),
        ("Esc", "Voltar"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}
