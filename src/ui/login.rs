use super::help_line;
use crate::app::{LoginField, LoginForm, LoginMode};
use crate::ui::layout::{calculate_form_chunks, centered_rect};
use crate::utils::{display_width, mask};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const FORM_WIDTH: u16 = 60;

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn draw_field(f: &mut Frame, area: Rect, title: &str, shown: &str, focused: bool) {
    let field = Paragraph::new(shown.to_string()).block(field_block(title, focused));
    f.render_widget(field, area);
    if focused {
        let x = area.x + 1 + display_width(shown).min(area.width.saturating_sub(3));
        f.set_cursor_position((x, area.y + 1));
    }
}

pub fn draw_login(f: &mut Frame, form: &LoginForm) {
    let layout = calculate_form_chunks(f.area());

    let subtitle = match form.mode {
        LoginMode::SignIn => "Entrar",
        LoginMode::SignUp => "Criar conta",
    };
    let mut header_text = Text::default();
    header_text.push_line(Line::from(Span::styled(
        "🤟 LIBRAS + Matemática 🤟",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    header_text.push_line(Line::from(format!(
        "Sistema de ensino de matemática com sinais de LIBRAS - {}",
        subtitle
    )));
    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let mut constraints = vec![Constraint::Length(3), Constraint::Length(3)];
    if form.mode == LoginMode::SignUp {
        constraints.extend([Constraint::Length(3), Constraint::Length(3)]);
    }
    let rows = constraints.len() as u16 * 3;
    let body = centered_rect(FORM_WIDTH, rows, layout.body_area);
    let fields = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(body);

    draw_field(f, fields[0], "Email", &form.email, form.focus == LoginField::Email);
    draw_field(
        f,
        fields[1],
        "Senha",
        &mask(&form.password),
        form.focus == LoginField::Password,
    );
    if form.mode == LoginMode::SignUp {
        draw_field(f, fields[2], "Nome", &form.name, form.focus == LoginField::Name);
        let role = Paragraph::new(form.role.label()).block(field_block("Perfil (F3)", false));
        f.render_widget(role, fields[3]);
    }

    let message = if let Some(error) = &form.error {
        Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red))
    } else if let Some(info) = &form.info {
        Paragraph::new(info.as_str()).style(Style::default().fg(Color::Green))
    } else {
        Paragraph::new("Aprenda matemática de forma inclusiva!")
            .style(Style::default().fg(Color::DarkGray))
    };
    f.render_widget(
        message.alignment(Alignment::Center).wrap(Wrap { trim: true }),
        layout.message_area,
    );

    let toggle = match form.mode {
        LoginMode::SignIn => "Criar conta",
        LoginMode::SignUp => "Já tenho conta",
    };
    let help = Paragraph::new(help_line(&[
        ("Tab", "Próximo campo"),
        ("Enter", "Confirmar"),
        ("F2", toggle),
        ("Esc", "Sair"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}
