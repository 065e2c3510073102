pub mod layout;
mod login;
mod quiz;
mod results;
mod teacher;

use crate::app::App;
use crate::models::{AppState, NoticeLevel};
use crate::store::AccountStore;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

pub use layout::{calculate_form_chunks, calculate_quiz_chunks, calculate_results_chunks};
pub use login::draw_login;
pub use quiz::{draw_quit_confirmation, draw_quiz, legend_kind, legend_values, LegendKind};
pub use results::draw_results;
pub use teacher::draw_teacher;

pub fn draw<S: AccountStore>(f: &mut Frame, app: &App<S>) {
    match app.state {
        AppState::Login => draw_login(f, &app.login),
        AppState::Quiz => draw_quiz(f, app),
        AppState::QuizQuitConfirm => draw_quit_confirmation(f),
        AppState::Results => draw_results(f, app),
        AppState::Teacher => draw_teacher(f, &app.teacher),
    }

    if let Some(notice) = app.notices.last() {
        draw_notice(f, notice.level, &notice.message);
    }
}

/// One-line banner on the bottom row, over whatever is there.
fn draw_notice(f: &mut Frame, level: NoticeLevel, message: &str) {
    let area = f.area();
    if area.height == 0 {
        return;
    }
    let row = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    let color = match level {
        NoticeLevel::Info => Color::Green,
        NoticeLevel::Error => Color::Red,
    };
    f.render_widget(Clear, row);
    f.render_widget(
        Paragraph::new(message.to_string()).style(Style::default().fg(color)),
        row,
    );
}

/// Help line entries: a highlighted key followed by its label.
pub(crate) fn help_line(entries: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(entries.len() * 2);
    for (key, label) in entries {
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::from(format!(" {}  ", label)));
    }
    Line::from(spans)
}
