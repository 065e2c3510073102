use crate::auth::{self, SignUpOutcome};
use crate::generator::{OperationRanges, QuestionGenerator, TierPlan};
use crate::logger;
use crate::models::{AppState, Notice, Operation, Question, Role, UserSession};
use crate::session::{AnswerOutcome, QuizSession};
use crate::stats_worker::{StatsRecorder, StatsRequest, StatsResponse};
use crate::store::AccountStore;
use crate::teacher::{self, RangeField};
use crossbeam_channel::{Receiver, Sender};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const MAX_NOTICES: usize = 3;
/// Longest logout waits for queued stats writes.
const STATS_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
    Name,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub mode: LoginMode,
    pub focus: LoginField,
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub error: Option<String>,
    pub info: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            mode: LoginMode::SignIn,
            focus: LoginField::Email,
            email: String::new(),
            password: String::new(),
            name: String::new(),
            role: Role::Student,
            error: None,
            info: None,
        }
    }
}

impl LoginForm {
    fn fields(&self) -> &'static [LoginField] {
        match self.mode {
            LoginMode::SignIn => &[LoginField::Email, LoginField::Password],
            LoginMode::SignUp => &[LoginField::Email, LoginField::Password, LoginField::Name],
        }
    }

    fn focus_step(&mut self, forward: bool) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % fields.len()
        } else {
            (pos + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
            LoginField::Name => &mut self.name,
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            LoginMode::SignIn => LoginMode::SignUp,
            LoginMode::SignUp => LoginMode::SignIn,
        };
        if !self.fields().contains(&self.focus) {
            self.focus = LoginField::Email;
        }
        self.error = None;
        self.info = None;
    }

    fn toggle_role(&mut self) {
        self.role = match self.role {
            Role::Student => Role::Teacher,
            Role::Teacher => Role::Student,
        };
    }
}

/// Range inputs on the teacher panel, two per operation (min then max) in
/// `Operation::ALL` order.
#[derive(Debug, Clone)]
pub struct TeacherForm {
    pub inputs: Vec<String>,
    pub focus: usize,
    pub ranges: OperationRanges,
    pub preview: Option<Vec<Question>>,
    pub error: Option<String>,
}

impl Default for TeacherForm {
    fn default() -> Self {
        let ranges = teacher::default_ranges();
        let inputs = Operation::ALL
            .iter()
            .flat_map(|op| {
                let range = ranges.get(*op);
                [range.min.to_string(), range.max.to_string()]
            })
            .collect();
        Self {
            inputs,
            focus: 0,
            ranges,
            preview: None,
            error: None,
        }
    }
}

impl TeacherForm {
    pub fn field_at(index: usize) -> (Operation, RangeField) {
        let operation = Operation::ALL[(index / 2) % Operation::ALL.len()];
        let field = if index % 2 == 0 {
            RangeField::Min
        } else {
            RangeField::Max
        };
        (operation, field)
    }

    fn edit(&mut self, f: impl FnOnce(&mut String)) {
        f(&mut self.inputs[self.focus]);
        let (operation, field) = Self::field_at(self.focus);
        teacher::set_bound(&mut self.ranges, operation, field, &self.inputs[self.focus]);
    }
}

/// Everything the terminal UI shows, plus the key handling that moves
/// between screens. Nothing here touches the terminal.
pub struct App<S: AccountStore> {
    pub state: AppState,
    store: S,
    generator: QuestionGenerator<ChaCha8Rng>,
    plan: TierPlan,
    stats_tx: Sender<StatsRequest>,
    stats_rx: Receiver<StatsResponse>,
    in_flight: Arc<AtomicUsize>,
    pub user: Option<UserSession>,
    pub quiz: Option<QuizSession>,
    pub login: LoginForm,
    pub teacher: TeacherForm,
    pub selected_option: usize,
    pub last_outcome: Option<AnswerOutcome>,
    pub notices: Vec<Notice>,
    pub should_quit: bool,
}

impl<S: AccountStore> App<S> {
    pub fn new(
        store: S,
        generator: QuestionGenerator<ChaCha8Rng>,
        stats_tx: Sender<StatsRequest>,
        stats_rx: Receiver<StatsResponse>,
    ) -> Self {
        Self {
            state: AppState::Login,
            store,
            generator,
            plan: TierPlan::default(),
            stats_tx,
            stats_rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
            user: None,
            quiz: None,
            login: LoginForm::default(),
            teacher: TeacherForm::default(),
            selected_option: 0,
            last_outcome: None,
            notices: Vec::new(),
            should_quit: false,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.as_ref().and_then(|q| q.current_question().ok())
    }

    pub fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    /// Stats writes sent to the worker and not answered yet.
    pub fn pending_stats(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Applies every worker reply that has arrived, without blocking.
    pub fn poll_stats(&mut self) {
        while let Ok(response) = self.stats_rx.try_recv() {
            self.handle_stats_response(response);
        }
    }

    /// Blocks until the worker has answered every queued write, so the next
    /// sign-in reads totals that include them.
    fn drain_stats(&mut self) {
        let deadline = Instant::now() + STATS_DRAIN_TIMEOUT;
        while self.pending_stats() > 0 {
            match self.stats_rx.recv_deadline(deadline) {
                Ok(response) => self.handle_stats_response(response),
                Err(e) => {
                    logger::error(&format!(
                        "Stopped waiting for {} stats writes: {}",
                        self.pending_stats(),
                        e
                    ));
                    self.in_flight.store(0, Ordering::SeqCst);
                    break;
                }
            }
        }
    }

    pub fn handle_stats_response(&mut self, response: StatsResponse) {
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match response {
            StatsResponse::Saved { email, stats } => {
                if let Some(user) = self.user.as_mut()
                    && user.email == email
                {
                    user.stats = stats;
                }
            }
            StatsResponse::Failed { error, .. } => {
                self.notice(Notice::error(format!(
                    "Não foi possível salvar seus resultados: {}",
                    error
                )));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Login => self.handle_login_key(key),
            AppState::Quiz => self.handle_quiz_key(key),
            AppState::QuizQuitConfirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.logout(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.state = AppState::Quiz;
                }
                _ => {}
            },
            AppState::Results => self.handle_results_key(key),
            AppState::Teacher => self.handle_teacher_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.login.focus_step(true),
            KeyCode::BackTab | KeyCode::Up => self.login.focus_step(false),
            KeyCode::F(2) => self.login.toggle_mode(),
            KeyCode::F(3) if self.login.mode == LoginMode::SignUp => self.login.toggle_role(),
            KeyCode::Backspace => {
                self.login.focused_mut().pop();
            }
            KeyCode::Enter => self.submit_login(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.login.focused_mut().push(c);
            }
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        self.login.error = None;
        self.login.info = None;
        let result = match self.login.mode {
            LoginMode::SignIn => {
                auth::sign_in(&self.store, &self.login.email, &self.login.password)
                    .map(SignUpOutcome::SignedIn)
            }
            LoginMode::SignUp => auth::sign_up(
                &self.store,
                &self.login.email,
                &self.login.password,
                &self.login.name,
                self.login.role,
            ),
        };

        match result {
            Ok(SignUpOutcome::SignedIn(user)) => self.start_quiz(user),
            Ok(SignUpOutcome::ConfirmationPending { email }) => {
                self.login.mode = LoginMode::SignIn;
                self.login.focus = LoginField::Password;
                self.login.password.clear();
                self.login.info = Some(format!(
                    "Conta criada! Confirme o email {} antes de entrar.",
                    email
                ));
            }
            Err(e) => self.login.error = Some(e.to_string()),
        }
    }

    fn start_quiz(&mut self, user: UserSession) {
        let mut session = match QuizSession::start(&mut self.generator, &self.plan) {
            Ok(session) => session,
            Err(e) => {
                logger::error(&format!("Could not build the default session: {}", e));
                self.login.error = Some(format!("Não foi possível gerar as questões: {}", e));
                return;
            }
        };
        let mut recorder = StatsRecorder::new(user.email.clone(), user.stats, self.stats_tx.clone())
            .with_in_flight(Arc::clone(&self.in_flight));
        session.subscribe(move |event| recorder.observe(event));

        self.quiz = Some(session);
        self.user = Some(user);
        self.login = LoginForm::default();
        self.teacher = TeacherForm::default();
        self.selected_option = 0;
        self.last_outcome = None;
        self.state = AppState::Quiz;
    }

    fn handle_quiz_key(&mut self, key: KeyEvent) {
        let option_count = self.current_question().map(|q| q.options.len()).unwrap_or(0);
        match key.code {
            KeyCode::Esc => self.state = AppState::QuizQuitConfirm,
            KeyCode::Left => {
                self.selected_option = self.selected_option.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_option + 1 < option_count {
                    self.selected_option += 1;
                }
            }
            KeyCode::Enter => self.answer(self.selected_option),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < option_count {
                    self.answer(index);
                }
            }
            _ => {}
        }
    }

    fn answer(&mut self, option_index: usize) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        let Some(value) = quiz
            .current_question()
            .ok()
            .and_then(|q| q.options.get(option_index).copied())
        else {
            return;
        };

        match quiz.submit_answer(value) {
            Ok(outcome) => {
                self.last_outcome = Some(outcome);
                self.selected_option = 0;
                if outcome.complete {
                    self.state = AppState::Results;
                }
            }
            Err(e) => {
                logger::error(&format!("Answer rejected: {}", e));
                self.state = AppState::Results;
            }
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('t') if self.user.as_ref().is_some_and(|u| u.is_teacher()) => {
                self.teacher.error = None;
                self.state = AppState::Teacher;
            }
            KeyCode::Char('l') => self.logout(),
            _ => {}
        }
    }

    fn restart(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        match quiz.restart(&mut self.generator, &self.plan) {
            Ok(()) => {
                self.selected_option = 0;
                self.last_outcome = None;
                self.state = AppState::Quiz;
            }
            Err(e) => {
                logger::error(&format!("Restart failed: {}", e));
                self.notice(Notice::error(format!(
                    "Não foi possível gerar novas questões: {}",
                    e
                )));
            }
        }
    }

    fn handle_teacher_key(&mut self, key: KeyEvent) {
        let field_count = self.teacher.inputs.len();
        match key.code {
            KeyCode::Esc => self.state = AppState::Results,
            KeyCode::Tab | KeyCode::Down => {
                self.teacher.focus = (self.teacher.focus + 1) % field_count;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.teacher.focus = (self.teacher.focus + field_count - 1) % field_count;
            }
            KeyCode::Backspace => self.teacher.edit(|s| {
                s.pop();
            }),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                self.teacher.edit(|s| s.push(c));
            }
            KeyCode::Char('g') => self.generate_custom(),
            KeyCode::Char('u') => self.use_custom(),
            _ => {}
        }
    }

    fn generate_custom(&mut self) {
        match teacher::generate_from_ranges(&mut self.generator, &self.teacher.ranges) {
            Ok(questions) => {
                self.teacher.preview = Some(questions);
                self.teacher.error = None;
            }
            Err(e) => {
                self.teacher.preview = None;
                self.teacher.error = Some(format!("Não foi possível gerar as questões: {}", e));
            }
        }
    }

    fn use_custom(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        let Some(questions) = self.teacher.preview.take() else {
            self.teacher.error = Some("Gere as questões antes de usá-las (g)".to_string());
            return;
        };
        quiz.replace_questions(questions);
        self.selected_option = 0;
        self.last_outcome = None;
        self.state = AppState::Quiz;
    }

    pub fn logout(&mut self) {
        self.drain_stats();
        if let Some(user) = self.user.take() {
            logger::log(&format!("Logged out {}", user.email));
        }
        self.quiz = None;
        self.login = LoginForm::default();
        self.teacher = TeacherForm::default();
        self.selected_option = 0;
        self.last_outcome = None;
        self.state = AppState::Login;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stats;
    use crate::stats_worker::spawn_stats_worker;
    use crate::store::memory::MemoryStore;
    use crossbeam_channel::{Receiver, unbounded};
    use rand::SeedableRng;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<S: AccountStore>(app: &mut App<S>, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn app_with(store: MemoryStore) -> (App<MemoryStore>, Receiver<StatsRequest>) {
        let (tx, rx) = unbounded();
        // No worker: replies never come and the drain stops at once.
        let (_, responses) = unbounded();
        let generator = QuestionGenerator::with_rng(ChaCha8Rng::seed_from_u64(7));
        (App::new(store, generator, tx, responses), rx)
    }

    fn signed_in(role: Role) -> (App<MemoryStore>, Receiver<StatsRequest>) {
        let store = MemoryStore::new().with_account("ana@escola.br", "1234", "Ana", role);
        let (mut app, rx) = app_with(store);
        type_text(&mut app, "ana@escola.br");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "1234");
        app.handle_key(press(KeyCode::Enter));
        (app, rx)
    }

    fn answer_all_correctly<S: AccountStore>(app: &mut App<S>) {
        while app.state == AppState::Quiz {
            let question = app.current_question().unwrap();
            let index = question
                .options
                .iter()
                .position(|o| *o == question.result)
                .unwrap();
            app.handle_key(press(KeyCode::Char(char::from(b'1' + index as u8))));
        }
    }

    #[test]
    fn test_sign_in_starts_default_quiz() {
        let (app, _rx) = signed_in(Role::Student);
        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.quiz.as_ref().unwrap().questions().len(), 12);
        assert_eq!(app.user.as_ref().unwrap().name, "Ana");
        assert!(app.login.password.is_empty());
    }

    #[test]
    fn test_bad_login_shows_error() {
        let (mut app, _rx) = app_with(MemoryStore::new());
        type_text(&mut app, "ana");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "1234");
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.state, AppState::Login);
        assert_eq!(
            app.login.error.as_deref(),
            Some("Por favor, insira um email válido")
        );
    }

    #[test]
    fn test_sign_up_with_confirmation_returns_to_sign_in() {
        let (mut app, _rx) = app_with(MemoryStore::requiring_confirmation());
        app.handle_key(press(KeyCode::F(2)));
        assert_eq!(app.login.mode, LoginMode::SignUp);
        type_text(&mut app, "bia@escola.br");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "abcd");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "Bia");
        app.handle_key(press(KeyCode::F(3)));
        assert_eq!(app.login.role, Role::Teacher);
        app.handle_key(press(KeyCode::Enter));

        assert_eq!(app.state, AppState::Login);
        assert_eq!(app.login.mode, LoginMode::SignIn);
        assert!(app.login.info.is_some());
        assert!(app.login.password.is_empty());
    }

    #[test]
    fn test_number_keys_answer_and_advance() {
        let (mut app, rx) = signed_in(Role::Student);
        let first_id = app.current_question().unwrap().id;
        app.handle_key(press(KeyCode::Char('1')));
        let outcome = app.last_outcome.unwrap();
        assert_eq!(outcome.index, 0);
        assert_ne!(app.current_question().unwrap().id, first_id);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_arrow_selection_and_enter() {
        let (mut app, _rx) = signed_in(Role::Student);
        let expected = app.current_question().unwrap().options[2];
        app.handle_key(press(KeyCode::Right));
        app.handle_key(press(KeyCode::Right));
        app.handle_key(press(KeyCode::Right));
        app.handle_key(press(KeyCode::Right));
        assert_eq!(app.selected_option, 3);
        app.handle_key(press(KeyCode::Left));
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.quiz.as_ref().unwrap().answers(), &[expected]);
        assert_eq!(app.selected_option, 0);
    }

    #[test]
    fn test_completing_quiz_shows_results() {
        let (mut app, rx) = signed_in(Role::Student);
        answer_all_correctly(&mut app);
        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.quiz.as_ref().unwrap().score().correct, 12);

        let last = rx.try_iter().last().unwrap();
        assert_eq!(
            last,
            StatsRequest::Save {
                email: "ana@escola.br".to_string(),
                stats: Stats {
                    correct: 12,
                    incorrect: 0,
                    solved: 12
                }
            }
        );
    }

    #[test]
    fn test_restart_from_results() {
        let (mut app, _rx) = signed_in(Role::Student);
        answer_all_correctly(&mut app);
        app.handle_key(press(KeyCode::Char('r')));
        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.quiz.as_ref().unwrap().answers().len(), 0);
        assert!(app.last_outcome.is_none());
    }

    #[test]
    fn test_teacher_panel_is_teacher_only() {
        let (mut app, _rx) = signed_in(Role::Student);
        answer_all_correctly(&mut app);
        app.handle_key(press(KeyCode::Char('t')));
        assert_eq!(app.state, AppState::Results);
    }

    #[test]
    fn test_teacher_generates_and_hands_off() {
        let (mut app, _rx) = signed_in(Role::Teacher);
        answer_all_correctly(&mut app);
        app.handle_key(press(KeyCode::Char('t')));
        assert_eq!(app.state, AppState::Teacher);

        // Addition max: clear "20" and type "5".
        app.handle_key(press(KeyCode::Tab));
        app.handle_key(press(KeyCode::Backspace));
        app.handle_key(press(KeyCode::Backspace));
        type_text(&mut app, "5");
        assert_eq!(app.teacher.ranges.addition.max, 5);

        app.handle_key(press(KeyCode::Char('u')));
        assert!(app.teacher.error.is_some());
        assert_eq!(app.state, AppState::Teacher);

        app.handle_key(press(KeyCode::Char('g')));
        let preview = app.teacher.preview.clone().unwrap();
        assert_eq!(preview.len(), 12);
        app.handle_key(press(KeyCode::Char('u')));

        assert_eq!(app.state, AppState::Quiz);
        let quiz = app.quiz.as_ref().unwrap();
        assert_eq!(quiz.questions(), preview.as_slice());
        assert!(quiz.answers().is_empty());
        for q in quiz.questions().iter().filter(|q| q.operation == Operation::Addition) {
            assert!(q.operand1 <= 5 && q.operand2 <= 5);
        }
    }

    #[test]
    fn test_replaced_quiz_keeps_accumulating_stats() {
        let (mut app, rx) = signed_in(Role::Teacher);
        answer_all_correctly(&mut app);
        app.handle_key(press(KeyCode::Char('t')));
        app.handle_key(press(KeyCode::Char('g')));
        app.handle_key(press(KeyCode::Char('u')));
        let _ = rx.try_iter().count();

        app.handle_key(press(KeyCode::Char('1')));
        let StatsRequest::Save { stats, .. } = rx.try_iter().last().unwrap();
        assert_eq!(stats.solved, 13);
    }

    #[test]
    fn test_esc_asks_before_logout() {
        let (mut app, _rx) = signed_in(Role::Student);
        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.state, AppState::QuizQuitConfirm);
        app.handle_key(press(KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Quiz);

        app.handle_key(press(KeyCode::Esc));
        app.handle_key(press(KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Login);
        assert!(app.user.is_none());
        assert!(app.quiz.is_none());
    }

    #[test]
    fn test_logout_waits_for_queued_stats() {
        let store = Arc::new(MemoryStore::new().with_account(
            "ana@escola.br",
            "1234",
            "Ana",
            Role::Student,
        ));
        let (stats_tx, stats_rx) = unbounded();
        let (responses_tx, responses_rx) = unbounded();
        let worker = spawn_stats_worker(Arc::clone(&store), responses_tx, stats_rx).unwrap();
        let generator = QuestionGenerator::with_rng(ChaCha8Rng::seed_from_u64(7));
        let mut app = App::new(Arc::clone(&store), generator, stats_tx, responses_rx);

        let sign_in = |app: &mut App<Arc<MemoryStore>>| {
            type_text(app, "ana@escola.br");
            app.handle_key(press(KeyCode::Tab));
            type_text(app, "1234");
            app.handle_key(press(KeyCode::Enter));
        };
        sign_in(&mut app);
        for _ in 0..3 {
            app.handle_key(press(KeyCode::Char('1')));
        }

        app.handle_key(press(KeyCode::Esc));
        app.handle_key(press(KeyCode::Char('y')));
        assert_eq!(app.pending_stats(), 0);
        assert_eq!(store.stats("ana@escola.br").map(|s| s.solved), Some(3));

        sign_in(&mut app);
        assert_eq!(app.user.as_ref().unwrap().stats.solved, 3);

        drop(app);
        worker.join().unwrap();
    }

    #[test]
    fn test_poll_stats_applies_replies() {
        let store = MemoryStore::new().with_account("ana@escola.br", "1234", "Ana", Role::Student);
        let (tx, _rx) = unbounded();
        let (responses_tx, responses_rx) = unbounded();
        let generator = QuestionGenerator::with_rng(ChaCha8Rng::seed_from_u64(7));
        let mut app = App::new(store, generator, tx, responses_rx);
        type_text(&mut app, "ana@escola.br");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "1234");
        app.handle_key(press(KeyCode::Enter));

        app.handle_key(press(KeyCode::Char('1')));
        assert_eq!(app.pending_stats(), 1);
        let stats = Stats {
            correct: 0,
            incorrect: 1,
            solved: 1,
        };
        responses_tx
            .send(StatsResponse::Saved {
                email: "ana@escola.br".to_string(),
                stats,
            })
            .unwrap();
        app.poll_stats();
        assert_eq!(app.pending_stats(), 0);
        assert_eq!(app.user.as_ref().unwrap().stats, stats);
    }

    #[test]
    fn test_ctrl_c_quits_from_any_screen() {
        let (mut app, _rx) = signed_in(Role::Student);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let (mut app, _rx) = app_with(MemoryStore::new());
        let mut key = press(KeyCode::Char('a'));
        key.kind = KeyEventKind::Release;
        app.handle_key(key);
        assert!(app.login.email.is_empty());
    }

    #[test]
    fn test_stats_responses() {
        let (mut app, _rx) = signed_in(Role::Student);
        let stats = Stats {
            correct: 1,
            incorrect: 0,
            solved: 1,
        };
        app.handle_stats_response(StatsResponse::Saved {
            email: "ana@escola.br".to_string(),
            stats,
        });
        assert_eq!(app.user.as_ref().unwrap().stats, stats);

        for _ in 0..5 {
            app.handle_stats_response(StatsResponse::Failed {
                email: "ana@escola.br".to_string(),
                error: "offline".to_string(),
            });
        }
        assert_eq!(app.notices.len(), MAX_NOTICES);
        assert_eq!(app.state, AppState::Quiz);
    }
}
