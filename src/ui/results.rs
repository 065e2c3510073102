use super::help_line;
use crate::app::App;
use crate::results::{review, Performance, ResultsSummary};
use crate::store::AccountStore;
use crate::ui::layout::calculate_results_chunks;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn performance_color(performance: Performance) -> Color {
    match performance {
        Performance::Excellent => Color::Green,
        Performance::VeryGood => Color::Blue,
        Performance::Good => Color::Yellow,
        Performance::KeepPracticing => Color::Red,
    }
}

pub fn draw_results<S: AccountStore>(f: &mut Frame, app: &App<S>) {
    let Some(quiz) = app.quiz.as_ref() else {
        return;
    };
    let layout = calculate_results_chunks(f.area());
    let summary = ResultsSummary::for_session(quiz);
    let performance = summary.performance();

    let name = app.user.as_ref().map(|u| u.name.as_str()).unwrap_or("");
    let header = Paragraph::new(format!(
        "Resultados - {} - {}",
        name,
        chrono::Local::now().format("%d/%m/%Y %H:%M")
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let color = performance_color(performance);
    let mut score_text = Text::default();
    score_text.push_line(Line::from(Span::styled(
        format!("{} {}  {}%", performance.emoji(), performance.label(), summary.percentage),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    score_text.push_line(Line::from(format!(
        "Acertos: {}   Erros: {}   Total: {}",
        summary.correct, summary.incorrect, summary.total
    )));
    if let Some(user) = &app.user {
        score_text.push_line(Line::from(Span::styled(
            format!(
                "Histórico: {} acertos, {} erros, {} questões resolvidas",
                user.stats.correct, user.stats.incorrect, user.stats.solved
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let score = Paragraph::new(score_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(score, layout.score_area);

    let wrong = review(quiz.questions(), quiz.answers());
    let mut review_text = Text::default();
    if wrong.is_empty() {
        review_text.push_line(Line::from(Span::styled(
            "🏆 Parabéns! Você acertou todas as questões!",
            Style::default().fg(Color::Green),
        )));
    }
    for item in &wrong {
        review_text.push_line(Line::from(vec![
            Span::styled(
                format!("{:>2}. ", item.position),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::from(format!(
                "{} ({}) ",
                item.question.prompt(),
                item.question.operation.display_name()
            )),
            Span::styled(
                format!("Sua resposta: {}", item.given),
                Style::default().fg(Color::Red),
            ),
            Span::from("  "),
            Span::styled(
                format!("Correta: {}", item.question.result),
                Style::default().fg(Color::Green),
            ),
        ]));
    }
    let review_widget = Paragraph::new(review_text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Questões para revisar ({})", wrong.len())),
        );
    f.render_widget(review_widget, layout.review_area);

    let is_teacher = app.user.as_ref().is_some_and(|u| u.is_teacher());
    let mut entries = vec![("r", "Jogar novamente")];
    if is_teacher {
        entries.push(("t", "Painel do professor"));
    }
    entries.extend([("l", "Sair da conta"), ("Ctrl+C", "Fechar")]);
    let help = Paragraph::new(help_line(&entries))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}
