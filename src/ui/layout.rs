use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct QuizLayout {
    pub header_area: Rect,
    pub question_area: Rect,
    pub legend_area: Rect,
    pub options_area: Rect,
    pub feedback_area: Rect,
    pub help_area: Rect,
}

pub struct ResultsLayout {
    pub header_area: Rect,
    pub score_area: Rect,
    pub review_area: Rect,
    pub footer_area: Rect,
}

pub struct FormLayout {
    pub header_area: Rect,
    pub body_area: Rect,
    pub message_area: Rect,
    pub help_area: Rect,
}

pub fn calculate_quiz_chunks(area: Rect) -> QuizLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    QuizLayout {
        header_area: chunks[0],
        question_area: chunks[1],
        legend_area: chunks[2],
        options_area: chunks[3],
        feedback_area: chunks[4],
        help_area: chunks[5],
    }
}

pub fn calculate_results_chunks(area: Rect) -> ResultsLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    ResultsLayout {
        header_area: chunks[0],
        score_area: chunks[1],
        review_area: chunks[2],
        footer_area: chunks[3],
    }
}

/// Layout shared by the login and teacher forms.
pub fn calculate_form_chunks(area: Rect) -> FormLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    FormLayout {
        header_area: chunks[0],
        body_area: chunks[1],
        message_area: chunks[2],
        help_area: chunks[3],
    }
}

/// A `width` x `height` box centred in `area`, clipped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_quiz_chunks(area);

        // 38 rows after the margin; fixed rows take 17, the legend gets the rest.
        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.question_area.height, 5);
        assert_eq!(layout.options_area.height, 3);
        assert_eq!(layout.help_area.height, 3);
        assert_eq!(layout.legend_area.height, 21);
    }

    #[test]
    fn test_results_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_results_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.score_area.height, 6);
        assert_eq!(layout.footer_area.height, 3);
        assert_eq!(layout.review_area.height, 38 - 12);
    }

    #[test]
    fn test_form_layout() {
        let layout = calculate_form_chunks(Rect::new(0, 0, 80, 30));
        assert_eq!(layout.header_area.height, 4);
        assert_eq!(layout.body_area.height, 28 - 10);
        assert_eq!(layout.help_area.y + layout.help_area.height, 29);
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(centered_rect(40, 10, area), Rect::new(30, 20, 40, 10));
        assert_eq!(centered_rect(200, 10, area).width, 100);
    }
}
