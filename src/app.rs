//! Core application state and logic.
//!
//! This module contains the main [`App`] struct that holds the dashboard's
//! state: the location pickers, the last status / account / settings the
//! tool reported, and UI state. Every adapter call runs on a worker thread;
//! results come back as [`Message::Response`] and are applied in
//! [`App::handle_message`].

use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use crate::config::AppConfig;
use crate::constants;
use crate::core::{spawn_request, Request, Response};
use crate::logger::{self, LogLevel};
use crate::message::{Message, SelectionMove};
use crate::vpn::{self, CommandAdapter};

// Re-export state types for convenient access
pub use crate::state::{
    AccountInfo, ConnectTarget, ConnectionStatus, FocusedPanel, InputMode, Location, ServerGroup,
    Setting, SettingsSnapshot, Toast, ToastType, DISMISS_DURATION,
};

/// Main application state container.
#[allow(clippy::struct_excessive_bools)]
pub struct App {
    /// Flag indicating the application should exit.
    pub should_quit: bool,

    // === Pickers ===
    /// `None` until the first `countries` query returns.
    pub countries: Option<Vec<Location>>,
    /// Cities of [`Self::cities_for`]; `None` while loading.
    pub cities: Option<Vec<Location>>,
    /// Country the city list belongs to. Responses for any other country are stale.
    pub cities_for: Option<Location>,
    pub groups: Option<Vec<ServerGroup>>,
    pub country_state: ListState,
    pub city_state: ListState,
    pub group_state: ListState,
    pub settings_state: ListState,
    /// Connect to the selected group instead of a location.
    pub use_group: bool,

    // === Tool State ===
    /// `None` until the first status query returns.
    pub status: Option<ConnectionStatus>,
    pub status_checked: Option<SystemTime>,
    /// `None` until the account query returns.
    pub account: Option<AccountInfo>,
    pub settings: SettingsSnapshot,
    pub settings_loaded: bool,

    // === Background Work ===
    /// Requests sent to workers and not yet answered.
    pub pending: usize,
    status_in_flight: bool,
    /// A connect or disconnect is running.
    action_in_flight: bool,
    last_status_poll: Instant,
    status_poll_rate: Duration,
    /// When set, load cities for the selected country once this passes.
    city_load_due: Option<Instant>,

    // === UI State ===
    pub focused_panel: FocusedPanel,
    pub input_mode: InputMode,
    pub toast: Option<Toast>,
    /// Scroll position for logs panel (logs stored in logger module)
    pub logs_scroll: u16,
    pub logs_auto_scroll: bool,
    pub terminal_size: (u16, u16),

    // === Async Communication ===
    adapter: Arc<CommandAdapter>,
    cmd_tx: mpsc::Sender<Message>,
    cmd_rx: mpsc::Receiver<Message>,
}

/// Delay between moving through the country list and loading its cities.
const CITY_DEBOUNCE: Duration = Duration::from_millis(constants::CITY_DEBOUNCE_MS);

impl App {
    /// Creates the app and starts the initial queries.
    pub fn new(adapter: CommandAdapter, config: &AppConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Message>();
        let mut app = Self {
            should_quit: false,

            countries: None,
            cities: None,
            cities_for: None,
            groups: None,
            country_state: ListState::default(),
            city_state: ListState::default(),
            group_state: ListState::default(),
            settings_state: ListState::default().with_selected(Some(0)),
            use_group: false,

            status: None,
            status_checked: None,
            account: None,
            settings: SettingsSnapshot::default(),
            settings_loaded: false,

            pending: 0,
            status_in_flight: false,
            action_in_flight: false,
            last_status_poll: Instant::now(),
            status_poll_rate: Duration::from_secs(config.status_poll_rate.max(1)),
            city_load_due: None,

            focused_panel: FocusedPanel::default(),
            input_mode: InputMode::Normal,
            toast: None,
            logs_scroll: 0,
            logs_auto_scroll: true,
            terminal_size: (0, 0),

            adapter: Arc::new(adapter),
            cmd_tx,
            cmd_rx,
        };

        crate::log_info!(
            "APP",
            "{} v{} using `{}`",
            constants::APP_NAME,
            constants::APP_VERSION,
            app.adapter.config().program
        );

        app.request(Request::Countries);
        app.request(Request::Groups);
        app.request_status();
        app.request(Request::Account);
        app.request(Request::Settings);
        app
    }

    // === Selection Accessors ===

    pub fn selected_country(&self) -> Option<&Location> {
        selected(self.countries.as_deref(), &self.country_state)
    }

    /// Selected city, only if the list belongs to the selected country.
    pub fn selected_city(&self) -> Option<&Location> {
        if self.cities_for.as_ref() != self.selected_country() {
            return None;
        }
        selected(self.cities.as_deref(), &self.city_state)
    }

    pub fn selected_group(&self) -> Option<&ServerGroup> {
        selected(self.groups.as_deref(), &self.group_state)
    }

    pub fn selected_setting(&self) -> Option<Setting> {
        self.settings_state
            .selected()
            .and_then(|i| Setting::ALL.get(i).copied())
    }

    /// Whether the last known status says connected.
    pub fn is_connected(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.connected)
    }

    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    // === Input ===

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        // 1. Global: Quit (Always takes priority)
        if (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
            || (key.code == KeyCode::Char('q') && self.input_mode == InputMode::Normal)
        {
            self.handle_message(Message::Quit);
            return;
        }

        // 2. Overlays capture all other keys
        if let InputMode::Dns { input, cursor } = &mut self.input_mode {
            match key.code {
                KeyCode::Esc => self.handle_message(Message::CloseOverlay),
                KeyCode::Enter => {
                    let address = input.clone();
                    self.handle_message(Message::SubmitDns(address));
                }
                _ => handle_text_field_input(key, input, cursor),
            }
            return;
        }

        self.handle_normal_keys(key);
    }

    fn handle_normal_keys(&mut self, key: KeyEvent) {
        let msg = match key.code {
            KeyCode::Tab => Message::NextPanel,
            KeyCode::BackTab => Message::PreviousPanel,
            KeyCode::Char('j') | KeyCode::Down => Message::Move(SelectionMove::Next),
            KeyCode::Char('k') | KeyCode::Up => Message::Move(SelectionMove::Prev),
            KeyCode::Home => Message::Move(SelectionMove::First),
            KeyCode::End | KeyCode::Char('G') => Message::Move(SelectionMove::Last),
            KeyCode::Enter => Message::Activate,
            KeyCode::Char('c') => Message::Connect,
            KeyCode::Char('Q') => Message::QuickConnect,
            KeyCode::Char('d') => Message::Disconnect,
            KeyCode::Char('r') => Message::Refresh,
            KeyCode::Char('g') => Message::ToggleUseGroup,
            KeyCode::Char(' ') if self.focused_panel == FocusedPanel::Settings => {
                Message::ToggleSetting
            }
            KeyCode::Char('n') => Message::OpenDns,
            KeyCode::Char('L') if self.focused_panel == FocusedPanel::Logs => Message::ClearLogs,
            KeyCode::Char('1') => Message::FocusPanel(FocusedPanel::Countries),
            KeyCode::Char('2') => Message::FocusPanel(FocusedPanel::Cities),
            KeyCode::Char('3') => Message::FocusPanel(FocusedPanel::Groups),
            KeyCode::Char('4') => Message::FocusPanel(FocusedPanel::Settings),
            KeyCode::Esc => Message::CloseOverlay,
            _ => return,
        };
        self.handle_message(msg);
    }

    // === Update ===

    /// Applies one message to the state.
    pub fn handle_message(&mut self, msg: Message) {
        match msg {
            Message::NextPanel => self.focused_panel = self.focused_panel.next(),
            Message::PreviousPanel => self.focused_panel = self.focused_panel.previous(),
            Message::FocusPanel(panel) => self.focused_panel = panel,
            Message::Move(movement) => self.move_selection(movement),
            Message::Activate => self.activate(),

            Message::Connect => {
                let target = ConnectTarget::choose(
                    self.use_group,
                    self.selected_group(),
                    self.selected_city(),
                    self.selected_country(),
                );
                match target {
                    Some(target) => self.connect(target),
                    None => self.show_toast(
                        constants::MSG_NOTHING_TO_CONNECT.to_string(),
                        ToastType::Warning,
                    ),
                }
            }
            Message::QuickConnect => self.connect(ConnectTarget::Quick),
            Message::Disconnect => {
                if self.action_in_flight {
                    self.show_toast(
                        constants::MSG_ACTION_IN_PROGRESS.to_string(),
                        ToastType::Warning,
                    );
                    return;
                }
                self.action_in_flight = true;
                self.request(Request::Disconnect);
            }
            Message::Refresh => {
                self.request(Request::Countries);
                self.request(Request::Groups);
                self.request_status();
                self.request(Request::Account);
                self.request(Request::Settings);
            }
            Message::ToggleUseGroup => {
                self.use_group = !self.use_group;
                crate::log_debug!("APP", "Use server group: {}", self.use_group);
            }
            Message::ToggleSetting => {
                if let Some(setting) = self.selected_setting() {
                    let enabled = !self.settings.get(setting).unwrap_or(false);
                    self.request(Request::ApplySetting(setting, enabled));
                }
            }

            Message::OpenDns => {
                self.input_mode = InputMode::Dns {
                    input: String::new(),
                    cursor: 0,
                };
            }
            Message::SubmitDns(address) => {
                self.input_mode = InputMode::Normal;
                self.request(Request::SetDns(address));
            }

            Message::CloseOverlay => {
                self.input_mode = InputMode::Normal;
                self.toast = None;
            }
            Message::Toast(message, toast_type) => self.show_toast(message, toast_type),
            Message::ClearLogs => {
                logger::clear_logs();
                self.logs_scroll = 0;
                self.logs_auto_scroll = true;
            }
            Message::Quit => self.should_quit = true,

            Message::Tick => self.on_tick_message(),
            Message::Resize(w, h) => self.terminal_size = (w, h),
            Message::Response(response) => {
                self.pending = self.pending.saturating_sub(1);
                self.apply_response(response);
            }
        }
    }

    fn on_tick_message(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }

        if self.city_load_due.is_some_and(|due| Instant::now() >= due) {
            self.city_load_due = None;
            self.load_cities();
        }

        if self.last_status_poll.elapsed() >= self.status_poll_rate {
            // A slow tool must not pile up status processes.
            if !self.status_in_flight {
                self.request_status();
            }
        }

        if self.logs_auto_scroll {
            self.logs_scroll = u16::try_from(logger::len().saturating_sub(1)).unwrap_or(u16::MAX);
        }
    }

    fn apply_response(&mut self, response: Response) {
        match response {
            Response::Countries(result) => {
                let countries = vpn::or_default(result, "list countries");
                crate::log_info!("APP", "Loaded {} countries", countries.len());
                let selection = reselect(&countries, self.selected_country());
                self.country_state.select(selection);
                self.countries = Some(countries);
                self.load_cities();
            }
            Response::Cities { country, result } => {
                if self.cities_for.as_ref() != Some(&country) {
                    crate::log_debug!("APP", "Discarding stale city list for {country}");
                    return;
                }
                let cities = vpn::or_default(result, &format!("list cities in {country}"));
                self.city_state
                    .select(if cities.is_empty() { None } else { Some(0) });
                self.cities = Some(cities);
            }
            Response::Groups(result) => {
                let groups = vpn::or_default(result, "list server groups");
                let selection = reselect(&groups, self.selected_group());
                self.group_state.select(selection);
                self.groups = Some(groups);
            }
            Response::Status(result) => {
                self.status_in_flight = false;
                let status = vpn::or_default(result, "query status");
                if self.status.as_ref().map(|s| s.connected) != Some(status.connected) {
                    crate::log_info!("APP", "Status: {}", status.summary);
                }
                self.status = Some(status);
                self.status_checked = Some(SystemTime::now());
            }
            Response::Account(result) => {
                self.account = Some(vpn::or_default(result, "query account"));
            }
            Response::Settings(result) => {
                self.settings = vpn::or_default(result, "read settings");
                self.settings_loaded = true;
            }
            Response::Connected { target, result } => {
                self.action_in_flight = false;
                match result {
                    Ok(()) => self.show_toast(
                        format!("Connect requested: {target}"),
                        ToastType::Success,
                    ),
                    Err(e) => self.show_toast(format!("Connect failed: {e}"), ToastType::Error),
                }
                self.request_status();
            }
            Response::Disconnected(result) => {
                self.action_in_flight = false;
                match result {
                    Ok(()) => {
                        self.show_toast("Disconnect requested".to_string(), ToastType::Success);
                    }
                    Err(e) => {
                        self.show_toast(format!("Disconnect failed: {e}"), ToastType::Error);
                    }
                }
                self.request_status();
            }
            Response::SettingApplied {
                setting,
                enabled,
                result,
            } => {
                let state = if enabled { "on" } else { "off" };
                match result {
                    Ok(()) => {
                        self.settings.set(setting, enabled);
                        self.show_toast(format!("{setting} turned {state}"), ToastType::Success);
                        // The tool may have changed related settings too.
                        self.request(Request::Settings);
                    }
                    Err(e) => self.show_toast(
                        format!("Could not turn {setting} {state}: {e}"),
                        ToastType::Error,
                    ),
                }
            }
            Response::DnsSet { address, result } => match result {
                Ok(()) => self.show_toast(format!("DNS set to {address}"), ToastType::Success),
                Err(e) => self.show_toast(format!("Could not set DNS: {e}"), ToastType::Error),
            },
        }
    }

    // === Actions ===

    fn activate(&mut self) {
        match self.focused_panel {
            FocusedPanel::Countries => {
                self.city_load_due = None;
                self.load_cities();
                self.focused_panel = FocusedPanel::Cities;
            }
            FocusedPanel::Cities => match self.selected_city().cloned() {
                Some(city) => self.connect(ConnectTarget::Location(city)),
                None => self.show_toast(constants::MSG_SELECT_COUNTRY.to_string(), ToastType::Info),
            },
            FocusedPanel::Groups => {
                if let Some(group) = self.selected_group().cloned() {
                    self.connect(ConnectTarget::Group(group));
                }
            }
            FocusedPanel::Settings => self.handle_message(Message::ToggleSetting),
            FocusedPanel::Status => self.request_status(),
            FocusedPanel::Logs => {}
        }
    }

    fn connect(&mut self, target: ConnectTarget) {
        if self.action_in_flight {
            self.show_toast(
                constants::MSG_ACTION_IN_PROGRESS.to_string(),
                ToastType::Warning,
            );
            return;
        }
        crate::log_info!("APP", "Connecting: {target}");
        self.action_in_flight = true;
        self.request(Request::Connect(target));
    }

    /// Points the city list at the selected country and queries it.
    fn load_cities(&mut self) {
        let country = self.selected_country().cloned();
        if country.is_some() && country == self.cities_for && self.cities.is_some() {
            return;
        }
        self.cities = None;
        self.city_state.select(None);
        self.cities_for.clone_from(&country);
        if let Some(country) = country {
            self.request(Request::Cities(country));
        }
    }

    fn request_status(&mut self) {
        self.status_in_flight = true;
        self.last_status_poll = Instant::now();
        self.request(Request::Status);
    }

    fn request(&mut self, request: Request) {
        self.pending += 1;
        spawn_request(Arc::clone(&self.adapter), request, self.cmd_tx.clone());
    }

    fn move_selection(&mut self, movement: SelectionMove) {
        match self.focused_panel {
            FocusedPanel::Countries => {
                let len = self.countries.as_ref().map_or(0, Vec::len);
                let before = self.country_state.selected();
                step(&mut self.country_state, len, movement);
                if self.country_state.selected() != before {
                    self.city_load_due = Some(Instant::now() + CITY_DEBOUNCE);
                }
            }
            FocusedPanel::Cities => {
                let len = self.cities.as_ref().map_or(0, Vec::len);
                step(&mut self.city_state, len, movement);
            }
            FocusedPanel::Groups => {
                let len = self.groups.as_ref().map_or(0, Vec::len);
                step(&mut self.group_state, len, movement);
            }
            FocusedPanel::Settings => step(&mut self.settings_state, Setting::ALL.len(), movement),
            FocusedPanel::Logs => self.scroll_logs(movement),
            FocusedPanel::Status => {}
        }
    }

    fn scroll_logs(&mut self, movement: SelectionMove) {
        let max_scroll = u16::try_from(logger::len().saturating_sub(1)).unwrap_or(u16::MAX);
        match movement {
            SelectionMove::Prev => {
                self.logs_auto_scroll = false;
                self.logs_scroll = self.logs_scroll.saturating_sub(1);
            }
            SelectionMove::Next => {
                self.logs_scroll = self.logs_scroll.saturating_add(1).min(max_scroll);
                // Re-enable auto-scroll when reaching the end
                self.logs_auto_scroll = self.logs_scroll >= max_scroll;
            }
            SelectionMove::First => {
                self.logs_auto_scroll = false;
                self.logs_scroll = 0;
            }
            SelectionMove::Last => {
                self.logs_auto_scroll = true;
                self.logs_scroll = max_scroll;
            }
        }
    }

    /// Show a toast notification and log it
    fn show_toast(&mut self, message: String, toast_type: ToastType) {
        let level = match toast_type {
            ToastType::Info | ToastType::Success => LogLevel::Info,
            ToastType::Warning => LogLevel::Warning,
            ToastType::Error => LogLevel::Error,
        };
        logger::log(level, "APP", message.as_str());
        self.toast = Some(Toast {
            message,
            toast_type,
            expires: Instant::now() + DISMISS_DURATION,
        });
    }

    // === Event Loop Hooks ===

    /// Periodic tick from the event loop.
    pub fn on_tick(&mut self) {
        self.handle_message(Message::Tick);
    }

    /// Handle terminal resize.
    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.handle_message(Message::Resize(width, height));
    }

    /// Applies every response the workers have posted so far.
    /// Called by the main loop before each draw.
    pub fn process_external(&mut self) {
        while let Ok(msg) = self.cmd_rx.try_recv() {
            self.handle_message(msg);
        }
    }
}

fn selected<'a, T>(items: Option<&'a [T]>, state: &ListState) -> Option<&'a T> {
    items.and_then(|items| state.selected().and_then(|i| items.get(i)))
}

/// Index of `previous` in a reloaded list, else the first entry.
fn reselect<T: PartialEq>(items: &[T], previous: Option<&T>) -> Option<usize> {
    previous
        .and_then(|prev| items.iter().position(|item| item == prev))
        .or(if items.is_empty() { None } else { Some(0) })
}

/// Moves a list selection, clamping at both ends.
fn step(state: &mut ListState, len: usize, movement: SelectionMove) {
    if len == 0 {
        state.select(None);
        return;
    }
    let last = len - 1;
    let current = state.selected().unwrap_or(0).min(last);
    let next = match movement {
        SelectionMove::Next => (current + 1).min(last),
        SelectionMove::Prev => current.saturating_sub(1),
        SelectionMove::First => 0,
        SelectionMove::Last => last,
    };
    state.select(Some(next));
}

/// Single-line text editing; `cursor` counts characters, not bytes.
fn handle_text_field_input(key: KeyEvent, text: &mut String, cursor: &mut usize) {
    let len = text.chars().count();
    let byte_at = |text: &str, idx: usize| {
        text.char_indices()
            .nth(idx)
            .map_or(text.len(), |(byte, _)| byte)
    };
    match key.code {
        KeyCode::Left => *cursor = cursor.saturating_sub(1),
        KeyCode::Right => *cursor = (*cursor + 1).min(len),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = len,
        KeyCode::Backspace if *cursor > 0 => {
            text.remove(byte_at(text, *cursor - 1));
            *cursor -= 1;
        }
        KeyCode::Delete if *cursor < len => {
            text.remove(byte_at(text, *cursor));
        }
        KeyCode::Char(c) => {
            text.insert(byte_at(text, *cursor), c);
            *cursor += 1;
        }
        _ => {}
    }
}
