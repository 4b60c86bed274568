use crate::commands::{AppCommand, HELP_TEXT};
use crate::insights::{matches_query, AnalyticsSnapshot, DashboardSnapshot, QrEntry};
use crate::storage::repository::ReportDto;
use crate::submission::{
    FieldError, FormField, Notification, SubmissionError, SubmissionForm, SubmissionReceipt,
};
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ViewMode {
    Home,
    Dashboard,
    Submit,
    Analytics,
    QrManagement,
    Compliance,
    About,
}

impl ViewMode {
    pub const ALL: [ViewMode; 7] = [
        ViewMode::Home,
        ViewMode::Dashboard,
        ViewMode::Submit,
        ViewMode::Analytics,
        ViewMode::QrManagement,
        ViewMode::Compliance,
        ViewMode::About,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::Home => "Home",
            ViewMode::Dashboard => "Dashboard",
            ViewMode::Submit => "Submit E-Waste",
            ViewMode::Analytics => "Analytics",
            ViewMode::QrManagement => "QR Management",
            ViewMode::Compliance => "Compliance",
            ViewMode::About => "About",
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum InputMode {
    Normal,
    Command,
    Editing, // 正在编辑表单文本字段
}

#[derive(PartialEq, Debug, Clone)]
pub enum FocusArea {
    Menu,     // 焦点在左侧菜单
    MainView, // 焦点在主视图
}

#[derive(Debug)]
pub enum AppEvent {
    Message(String),
    Error(String),
    Submitted(SubmissionReceipt),
    SubmitFailed(SubmissionError),
    Dashboard(DashboardSnapshot),
    Analytics(AnalyticsSnapshot),
    QrCodes(Vec<QrEntry>),
    Reports(Vec<ReportDto>),
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

pub struct App {
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub focus_area: FocusArea,
    pub menu_selected_index: usize,
    pub user_label: Option<String>,
    pub form: SubmissionForm,
    pub form_selected: usize,
    pub form_errors: Vec<FieldError>,
    pub submitting: bool,
    pub dashboard: DashboardSnapshot,
    pub analytics: AnalyticsSnapshot,
    pub qr_all: Vec<QrEntry>,
    pub qr_list: Vec<QrEntry>,
    pub qr_query: String,
    pub selected_index: usize,
    pub qr_list_state: ListState,
    pub reports: Vec<ReportDto>,
    pub page_scroll: u16,
    pub command_input: String,
    pub command_cursor: usize,
    pub command_history: Vec<String>,
    pub command_history_index: Option<usize>,
    pub log_messages: Vec<String>,
    pub toast: Option<Toast>,
    pub cmd_tx: mpsc::UnboundedSender<AppCommand>,
    pub evt_rx: Option<mpsc::UnboundedReceiver<AppEvent>>,
}

impl App {
    pub fn new(
        startup_info: Vec<String>,
        user_label: Option<String>,
        cmd_tx: mpsc::UnboundedSender<AppCommand>,
        evt_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> App {
        let mut log_messages = vec!["应用已启动".to_string()];
        log_messages.extend(startup_info);

        App {
            view_mode: ViewMode::Home,
            input_mode: InputMode::Normal,
            focus_area: FocusArea::Menu,
            menu_selected_index: 0,
            user_label,
            form: SubmissionForm::default(),
            form_selected: 0,
            form_errors: Vec::new(),
            submitting: false,
            dashboard: DashboardSnapshot::default(),
            analytics: AnalyticsSnapshot::default(),
            qr_all: Vec::new(),
            qr_list: Vec::new(),
            qr_query: String::new(),
            selected_index: 0,
            qr_list_state: {
                let mut s = ListState::default();
                s.select(Some(0));
                s
            },
            reports: Vec::new(),
            page_scroll: 0,
            command_input: String::new(),
            command_cursor: 0,
            command_history: Vec::new(),
            command_history_index: None,
            log_messages,
            toast: None,
            cmd_tx,
            evt_rx: Some(evt_rx),
        }
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    pub fn show_toast(&mut self, notification: Notification) {
        self.toast = Some(Toast {
            notification,
            shown_at: Instant::now(),
        });
    }

    pub fn active_toast(&self) -> Option<&Notification> {
        self.toast
            .as_ref()
            .filter(|t| t.shown_at.elapsed() < TOAST_TTL)
            .map(|t| &t.notification)
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Message(msg) => self.add_log(msg),
            AppEvent::Error(msg) => self.add_log(msg),
            AppEvent::Submitted(receipt) => {
                self.submitting = false;
                self.form.reset();
                self.form_errors.clear();
                self.add_log(format!(
                    "✓ 已提交 {} [ID: {}] QR: {}",
                    receipt.item_name, receipt.item_id, receipt.qr_code
                ));
                self.show_toast(receipt.notification());
                let _ = self.cmd_tx.send(AppCommand::Refresh);
            }
            AppEvent::SubmitFailed(err) => {
                self.submitting = false;
                match err {
                    SubmissionError::Validation(errors) => {
                        self.add_log(format!("⚠ 表单有 {} 处需要修正", errors.len()));
                        // 跳到第一个出错的字段
                        if let Some(first) = errors.first() {
                            if let Some(pos) = FormField::ALL.iter().position(|f| *f == first.field)
                            {
                                self.form_selected = pos;
                            }
                        }
                        self.form_errors = errors;
                    }
                    other => {
                        self.add_log(format!("✗ 提交失败: {}", other));
                        if let Some(n) = other.notification() {
                            self.show_toast(n);
                        }
                    }
                }
            }
            AppEvent::Dashboard(snapshot) => self.dashboard = snapshot,
            AppEvent::Analytics(snapshot) => self.analytics = snapshot,
            AppEvent::QrCodes(list) => {
                self.qr_all = list;
                self.apply_qr_filter();
                self.clamp_selection();
            }
            AppEvent::Reports(list) => self.reports = list,
        }
    }

    pub fn selected_field(&self) -> FormField {
        FormField::ALL[self.form_selected.min(FormField::ALL.len() - 1)]
    }

    pub fn field_error(&self, field: FormField) -> Option<&'static str> {
        self.form_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    pub fn selected_qr(&self) -> Option<&QrEntry> {
        self.qr_list.get(self.selected_index)
    }

    pub fn clamp_selection(&mut self) {
        if self.selected_index >= self.qr_list.len() {
            self.selected_index = self.qr_list.len().saturating_sub(1);
        }
        self.qr_list_state.select(Some(self.selected_index));
    }

    pub fn apply_qr_filter(&mut self) {
        self.qr_list = self
            .qr_all
            .iter()
            .filter(|e| matches_query(e, &self.qr_query))
            .cloned()
            .collect();
        if self.selected_index >= self.qr_list.len() {
            self.selected_index = 0;
        }
        self.qr_list_state.select(Some(self.selected_index));
    }

    /// 提交进行中时忽略重复请求
    pub fn submit_form(&mut self) {
        if self.submitting {
            self.add_log("⚠ 正在提交，请稍候".to_string());
            return;
        }
        self.submitting = true;
        self.form_errors.clear();
        let _ = self.cmd_tx.send(AppCommand::SubmitForm(self.form.clone()));
    }

    fn switch_view(&mut self, view: ViewMode) {
        self.view_mode = view;
        self.page_scroll = 0;
        if let Some(i) = ViewMode::ALL.iter().position(|v| *v == view) {
            self.menu_selected_index = i;
        }
        let _ = self.cmd_tx.send(AppCommand::Refresh);
    }

    /// 执行一条命令，返回 true 表示退出应用
    pub fn run_command(&mut self, line: &str) -> bool {
        let cmd = AppCommand::from_str(line).unwrap_or_else(|_| AppCommand::Unknown(line.to_string()));
        match cmd {
            AppCommand::Submit { fields } => {
                for (field, value) in fields {
                    *self.form.get_mut(field) = value;
                }
                self.view_mode = ViewMode::Submit;
                self.menu_selected_index = 2;
                self.submit_form();
            }
            AppCommand::FormReset => {
                self.form.reset();
                self.form_errors.clear();
                self.form_selected = 0;
                self.add_log("表单已重置".to_string());
            }
            AppCommand::QrSearch(query) => {
                self.qr_query = query;
                self.apply_qr_filter();
                self.add_log(format!("QR 搜索: {} ({} 条)", self.qr_query, self.qr_list.len()));
            }
            AppCommand::QrClear => {
                self.qr_query.clear();
                self.apply_qr_filter();
            }
            AppCommand::Help => self.add_log(HELP_TEXT.to_string()),
            AppCommand::Quit => return true,
            AppCommand::Unknown(msg) => self.add_log(format!("✗ {}", msg)),
            other => {
                let _ = self.cmd_tx.send(other);
            }
        }
        false
    }

    /// 获取当前的预测建议
    pub fn get_completion_hint(&self) -> Option<String> {
        let commands = ["submit", "form", "qr", "refresh", "demo", "help", "quit"];
        let input = self.command_input.trim_start();

        if input.is_empty() {
            return None;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let complete = |cur: &str, subs: &[&str]| {
            subs.iter()
                .find(|s| s.starts_with(cur) && **s != cur)
                .map(|s| s[cur.len()..].to_string())
        };

        if parts.len() == 1 && !input.ends_with(' ') {
            return complete(parts[0], &commands);
        }
        let cur = if parts.len() == 1 { "" } else { parts[1] };
        match parts[0] {
            "form" => complete(cur, &["reset"]),
            "qr" => complete(cur, &["search", "clear", "url", "save"]),
            "demo" => complete(cur, &["seed"]),
            _ => None,
        }
    }

    fn leave_command_mode(&mut self) {
        self.command_input.clear();
        self.command_cursor = 0;
        self.input_mode = InputMode::Normal;
    }

    pub fn handle_key_event(&mut self, key: KeyCode) -> bool {
        match self.input_mode {
            InputMode::Command => return self.handle_command_key(key),
            InputMode::Editing => {
                self.handle_editing_key(key);
                return false;
            }
            InputMode::Normal => {}
        }

        // 正常模式下的按键处理
        match key {
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Command;
                self.command_input.clear();
                self.command_cursor = 0;
                false
            }
            KeyCode::Char('q') => true,
            KeyCode::Esc => {
                self.focus_area = FocusArea::Menu;
                false
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key == KeyCode::Right;
                if self.focus_area == FocusArea::MainView
                    && self.view_mode == ViewMode::Submit
                    && self.selected_field().choices().is_some()
                {
                    let field = self.selected_field();
                    self.form.cycle_choice(field, forward);
                } else if forward {
                    self.focus_area = FocusArea::MainView;
                } else {
                    self.focus_area = FocusArea::Menu;
                }
                false
            }
            KeyCode::Up => {
                if self.focus_area == FocusArea::Menu {
                    self.menu_selected_index = self.menu_selected_index.saturating_sub(1);
                } else {
                    match self.view_mode {
                        ViewMode::Submit => {
                            self.form_selected = self.form_selected.saturating_sub(1);
                        }
                        ViewMode::QrManagement => {
                            self.selected_index = self.selected_index.saturating_sub(1);
                            self.qr_list_state.select(Some(self.selected_index));
                        }
                        _ => self.page_scroll = self.page_scroll.saturating_sub(1),
                    }
                }
                false
            }
            KeyCode::Down => {
                if self.focus_area == FocusArea::Menu {
                    if self.menu_selected_index < ViewMode::ALL.len() - 1 {
                        self.menu_selected_index += 1;
                    }
                } else {
                    match self.view_mode {
                        ViewMode::Submit => {
                            if self.form_selected < FormField::ALL.len() - 1 {
                                self.form_selected += 1;
                            }
                        }
                        ViewMode::QrManagement => {
                            if self.selected_index < self.qr_list.len().saturating_sub(1) {
                                self.selected_index += 1;
                            }
                            self.qr_list_state.select(Some(self.selected_index));
                        }
                        _ => self.page_scroll = self.page_scroll.saturating_add(1),
                    }
                }
                false
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.focus_area == FocusArea::Menu {
                    if let Some(view) = ViewMode::ALL.get(self.menu_selected_index).copied() {
                        self.switch_view(view);
                    }
                    // 确认后自动切换焦点到主视图
                    self.focus_area = FocusArea::MainView;
                } else {
                    match self.view_mode {
                        ViewMode::Submit => {
                            let field = self.selected_field();
                            if !self.form.cycle_choice(field, true) {
                                self.input_mode = InputMode::Editing;
                            }
                        }
                        ViewMode::QrManagement => {
                            if let Some(entry) = self.selected_qr() {
                                let code = entry.code.clone();
                                let _ = self.cmd_tx.send(AppCommand::QrUrl { code });
                            }
                        }
                        _ => {}
                    }
                }
                false
            }
            KeyCode::Char('s') => {
                if self.focus_area == FocusArea::MainView && self.view_mode == ViewMode::Submit {
                    self.submit_form();
                }
                false
            }
            KeyCode::Char('r') => {
                if self.focus_area == FocusArea::MainView && self.view_mode == ViewMode::Submit {
                    self.run_command("form reset");
                } else {
                    let _ = self.cmd_tx.send(AppCommand::Refresh);
                }
                false
            }
            KeyCode::Char('w') => {
                if self.focus_area == FocusArea::MainView && self.view_mode == ViewMode::QrManagement
                {
                    if let Some(entry) = self.selected_qr() {
                        let code = entry.code.clone();
                        let _ = self.cmd_tx.send(AppCommand::QrSave { code });
                    }
                }
                false
            }
            _ => false,
        }
    }

    fn handle_editing_key(&mut self, key: KeyCode) {
        let field = self.selected_field();
        match key {
            KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Tab => {
                self.input_mode = InputMode::Normal;
                if self.form_selected < FormField::ALL.len() - 1 {
                    self.form_selected += 1;
                }
            }
            KeyCode::Backspace => {
                self.form.get_mut(field).pop();
            }
            KeyCode::Char(c) => self.form.get_mut(field).push(c),
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Enter => {
                let cmd_owned = self.command_input.trim().to_string();
                self.leave_command_mode();
                if cmd_owned.is_empty() {
                    return false;
                }
                self.command_history.push(cmd_owned.clone());
                self.command_history_index = None;
                self.run_command(&cmd_owned)
            }
            KeyCode::Esc => {
                self.leave_command_mode();
                false
            }
            KeyCode::Tab => {
                if let Some(hint) = self.get_completion_hint() {
                    let insert = format!("{} ", hint);
                    self.command_input.insert_str(self.command_cursor, &insert);
                    self.command_cursor += insert.len();
                }
                false
            }
            KeyCode::Up => {
                if self.command_history.is_empty() {
                    return false;
                }
                let next = match self.command_history_index {
                    None => self.command_history.len().saturating_sub(1),
                    Some(i) => i.saturating_sub(1),
                };
                self.command_history_index = Some(next);
                if let Some(cmd) = self.command_history.get(next) {
                    self.command_input = cmd.clone();
                    self.command_cursor = self.command_input.len();
                }
                false
            }
            KeyCode::Down => {
                let Some(i) = self.command_history_index else {
                    return false;
                };
                let n = i + 1;
                if n >= self.command_history.len() {
                    self.command_history_index = None;
                    self.command_input.clear();
                    self.command_cursor = 0;
                    return false;
                }
                self.command_history_index = Some(n);
                if let Some(cmd) = self.command_history.get(n) {
                    self.command_input = cmd.clone();
                    self.command_cursor = self.command_input.len();
                }
                false
            }
            KeyCode::Backspace => {
                if self.command_cursor > 0 {
                    let prev = prev_char_boundary(&self.command_input, self.command_cursor);
                    self.command_input.remove(prev);
                    self.command_cursor = prev;
                }
                false
            }
            KeyCode::Delete => {
                if self.command_cursor < self.command_input.len() {
                    self.command_input.remove(self.command_cursor);
                }
                false
            }
            KeyCode::Left => {
                if self.command_cursor > 0 {
                    self.command_cursor = prev_char_boundary(&self.command_input, self.command_cursor);
                }
                false
            }
            KeyCode::Right => {
                if let Some(c) = self.command_input[self.command_cursor..].chars().next() {
                    self.command_cursor += c.len_utf8();
                }
                false
            }
            KeyCode::Home => {
                self.command_cursor = 0;
                false
            }
            KeyCode::End => {
                self.command_cursor = self.command_input.len();
                false
            }
            KeyCode::Char(c) => {
                self.command_input.insert(self.command_cursor, c);
                self.command_cursor += c.len_utf8();
                false
            }
            _ => false,
        }
    }
}

// 光标按字节计，退格时回到上一个字符边界
fn prev_char_boundary(s: &str, cursor: usize) -> usize {
    s[..cursor]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}
