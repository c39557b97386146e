use super::menu::{Menu, MenuAction, WorkflowAction};

/// Menu navigation state.
///
/// The history is empty exactly when the current menu is [`Menu::Main`].
/// Once `running` is false the navigator is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: Menu,
    history: Vec<Menu>,
    running: bool,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: Menu::Main,
            history: Vec::new(),
            running: true,
        }
    }

    pub fn current(&self) -> Menu {
        self.current
    }

    pub fn history(&self) -> &[Menu] {
        &self.history
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn navigate_to_section(&mut self, section: Menu) {
        if !self.running || section == self.current {
            return;
        }
        if section == Menu::Main {
            self.return_to_main();
            return;
        }
        self.history.push(self.current);
        self.current = section;
        tracing::debug!(menu = %section, depth = self.history.len(), "navigate");
    }

    /// Go to the previous menu. No-op at the main menu.
    pub fn navigate_back(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.current = previous;
        }
    }

    pub fn return_to_main(&mut self) {
        self.history.clear();
        self.current = Menu::Main;
    }

    pub fn exit_wizard(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Apply a navigation action; workflow actions are handed back to the
    /// caller untouched.
    pub fn apply(&mut self, action: MenuAction) -> Option<WorkflowAction> {
        match action {
            MenuAction::Navigate(menu) => self.navigate_to_section(menu),
            MenuAction::Back => self.navigate_back(),
            MenuAction::Exit => self.exit_wizard(),
            MenuAction::Workflow(workflow) => return Some(workflow),
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_history_invariant(nav: &Navigator) {
        assert_eq!(nav.history().is_empty(), nav.current() == Menu::Main);
    }

    #[test]
    fn test_initial_state() {
        let nav = Navigator::new();
        assert_eq!(nav.current(), Menu::Main);
        assert!(nav.history().is_empty());
        assert!(nav.is_running());
    }

    #[test]
    fn test_navigate_then_back_returns_to_previous() {
        let mut nav = Navigator::new();
        nav.navigate_to_section(Menu::Release);
        assert_eq!(nav.current(), Menu::Release);
        assert_eq!(nav.history(), &[Menu::Main]);

        nav.navigate_back();
        assert_eq!(nav.current(), Menu::Main);
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_back_at_main_is_noop() {
        let mut nav = Navigator::new();
        nav.navigate_back();
        assert_eq!(nav, Navigator::new());
    }

    #[test]
    fn test_return_to_main_clears_history() {
        let mut nav = Navigator::new();
        nav.navigate_to_section(Menu::Status);
        nav.navigate_to_section(Menu::Issue);
        assert_eq!(nav.history(), &[Menu::Main, Menu::Status]);

        nav.return_to_main();
        assert_eq!(nav.current(), Menu::Main);
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_history_invariant_holds_across_sequences() {
        let mut nav = Navigator::new();
        let steps = [
            MenuAction::Navigate(Menu::Status),
            MenuAction::Navigate(Menu::Status),
            MenuAction::Navigate(Menu::Config),
            MenuAction::Back,
            MenuAction::Navigate(Menu::Main),
            MenuAction::Back,
            MenuAction::Navigate(Menu::Issue),
            MenuAction::Workflow(WorkflowAction::ViewIssue),
            MenuAction::Back,
        ];
        for step in steps {
            nav.apply(step);
            assert_history_invariant(&nav);
        }
        assert_eq!(nav.current(), Menu::Main);
    }

    #[test]
    fn test_apply_returns_workflows() {
        let mut nav = Navigator::new();
        nav.navigate_to_section(Menu::Config);
        let before = nav.clone();

        let action = nav.apply(MenuAction::Workflow(WorkflowAction::ShowConfig));
        assert_eq!(action, Some(WorkflowAction::ShowConfig));
        assert_eq!(nav, before);
    }

    #[test]
    fn test_exit_is_terminal() {
        let mut nav = Navigator::new();
        nav.apply(MenuAction::Exit);
        assert!(!nav.is_running());

        nav.navigate_to_section(Menu::Release);
        assert_eq!(nav.current(), Menu::Main);
        assert!(!nav.is_running());
    }

    #[test]
    fn test_reset() {
        let mut nav = Navigator::new();
        nav.navigate_to_section(Menu::Issue);
        nav.exit_wizard();
        nav.reset();
        assert_eq!(nav, Navigator::new());
        nav.reset();
        assert_eq!(nav, Navigator::new());
    }
}
