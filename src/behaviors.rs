use crate::announce::Announcer;
use crate::binding::{Action, BindingTable};
use crate::clipboard::{CopyFlash, CopySource};
use crate::config::BehaviorConfig;
use crate::doc::{DocStore, NodeId};
use crate::effects::{self, Effects};
use crate::input::{EventKind, Intersection, KeyInput, Outcome, PageEvent};
use crate::modal::ModalController;
use crate::page::{Page, Task};
use crate::scrollspy::{self, Scrollspy};
use crate::theme::{Theme, ThemeController};
use crate::toast::ToastController;

#[cfg(test)]
#[path = "behaviors_test.rs"]
mod behaviors_test;

/// Every page behavior plus the page it acts on.
///
/// The host feeds four kinds of input: listener invocations (`dispatch`),
/// timer expiries (`run_timer`), intersection batches (`on_intersections`)
/// and clipboard completions (`on_copied`). Nothing here touches the browser
/// directly, so the whole state machine runs against [`DocStore`] in tests.
pub struct Behaviors<P: Page> {
    page: P,
    config: BehaviorConfig,
    announcer: Announcer<P::Node>,
    modal: ModalController<P::Node>,
    scrollspy: Option<Scrollspy<P::Node>>,
    theme: ThemeController<P::Node>,
    toast: ToastController<P::Node>,
    copy: CopyFlash<P::Node>,
    effects: Effects<P::Node>,
    bindings: BindingTable<P::Node>,
}

impl<P: Page> Behaviors<P> {
    /// Wire every behavior into `page`.
    pub fn init(mut page: P, config: BehaviorConfig) -> Self {
        let theme = ThemeController::init(&mut page, &config);
        let effects = Effects::install(&mut page, &config);
        let announcer = Announcer::install(&mut page, config.announce_delay());
        let bindings = BindingTable::build(&mut page, &config);
        let scrollspy = Scrollspy::install(&mut page, &config);
        log::info!("behaviors: initialized ({} bindings, scrollspy {})", bindings.len(), scrollspy.is_some());

        Self {
            announcer,
            modal: ModalController::new(),
            scrollspy,
            theme,
            toast: ToastController::new(config.toast_duration_ms),
            copy: CopyFlash::new(config.copy_flash_ms),
            effects,
            bindings,
            config,
            page,
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    #[must_use]
    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    #[must_use]
    pub fn modal(&self) -> &ModalController<P::Node> {
        &self.modal
    }

    #[must_use]
    pub fn scrollspy(&self) -> Option<&Scrollspy<P::Node>> {
        self.scrollspy.as_ref()
    }

    #[must_use]
    pub fn announcer(&self) -> &Announcer<P::Node> {
        &self.announcer
    }

    #[must_use]
    pub fn bindings(&self) -> &BindingTable<P::Node> {
        &self.bindings
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    // --- Operations ---

    pub fn open_modal(&mut self, selector: &str) -> bool {
        self.modal.open(&mut self.page, &mut self.announcer, selector)
    }

    pub fn close_modal(&mut self, backdrop: Option<&P::Node>) -> bool {
        self.modal.close(&mut self.page, backdrop)
    }

    pub fn show_toast(&mut self, selector: &str, message: &str) -> bool {
        self.toast.show(&mut self.page, &mut self.announcer, selector, message)
    }

    pub fn announce(&mut self, message: &str) {
        self.announcer.announce(&mut self.page, message);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle(&mut self.page)
    }

    // --- Host inputs ---

    /// Route one listener invocation.
    pub fn dispatch(&mut self, event: &PageEvent<P::Node>) -> Outcome {
        match event.kind {
            EventKind::KeyDown => {
                let Some(key) = &event.key else {
                    return Outcome::PassThrough;
                };
                self.modal
                    .handle_key(&mut self.page, event.listener, key)
                    .unwrap_or_default()
            }
            EventKind::Click => {
                if let Some(outcome) = self.modal.handle_click(&mut self.page, event.listener, &event.target) {
                    return outcome;
                }
                let Some(binding) = self.bindings.action_for(event.listener) else {
                    log::debug!("behaviors: click on unbound listener {:?}", event.listener);
                    return Outcome::PassThrough;
                };
                let (trigger, action) = (binding.trigger.clone(), binding.action.clone());
                self.perform(&trigger, action)
            }
            EventKind::MouseEnter | EventKind::MouseLeave => {
                self.effects.on_hover(&mut self.page, event.listener);
                Outcome::PassThrough
            }
        }
    }

    fn perform(&mut self, trigger: &P::Node, action: Action<P::Node>) -> Outcome {
        match action {
            Action::OpenModal { selector } => {
                self.open_modal(&selector);
            }
            Action::CloseModal { backdrop } => {
                self.close_modal(backdrop.as_ref());
            }
            Action::ShowToast { selector } => {
                let message = self.config.toast_message.clone();
                self.show_toast(&selector, &message);
            }
            Action::ToggleTheme => {
                self.toggle_theme();
            }
            Action::Copy(source) => {
                self.request_copy(trigger, &source);
            }
            Action::ScrollTo { id } => return scrollspy::scroll_to_fragment(&mut self.page, &id),
        }
        Outcome::PassThrough
    }

    fn request_copy(&mut self, control: &P::Node, source: &CopySource) -> bool {
        self.copy.request(&mut self.page, control, source)
    }

    /// Timer expiry.
    pub fn run_timer(&mut self, task: Task<P::Node>) {
        match task {
            Task::Announce { message } => self.announcer.deliver(&mut self.page, &message),
            Task::HideToast { toast } => self.toast.hide(&mut self.page, &toast),
            Task::RestoreFlash { control } => self.copy.restore(&mut self.page, &control),
            Task::RevealCard { card } => effects::reveal(&mut self.page, &card),
        }
    }

    /// Intersection observer batch.
    pub fn on_intersections(&mut self, entries: &[Intersection<P::Node>]) {
        if let Some(spy) = &mut self.scrollspy {
            spy.on_intersections(&mut self.page, entries);
        }
    }

    /// A clipboard write started for `control` resolved successfully.
    pub fn on_copied(&mut self, control: &P::Node) {
        self.copy.on_copied(&mut self.page, &mut self.announcer, control);
    }
}

/// Headless drivers: synthesize what a browser would deliver.
impl Behaviors<DocStore> {
    /// Run every timer due within the next `ms` milliseconds, in order.
    pub fn advance(&mut self, ms: u64) {
        let until = self.page.now_ms() + ms;
        while let Some(task) = self.page.pop_due(until) {
            self.run_timer(task);
        }
        self.page.set_now(until);
    }

    /// Click `target`, bubbling through its ancestors.
    pub fn click(&mut self, target: NodeId) -> Outcome {
        self.bubble(target, EventKind::Click, None)
    }

    /// Press a key on the focused element, bubbling through its ancestors.
    pub fn press(&mut self, key: &str, shift: bool) -> Outcome {
        let Some(target) = self.page.active_element() else {
            return Outcome::PassThrough;
        };
        self.bubble(target, EventKind::KeyDown, Some(KeyInput::new(key, shift)))
    }

    /// Pointer enters (`enter`) or leaves `target`. Does not bubble.
    pub fn hover(&mut self, target: NodeId, enter: bool) {
        let kind = if enter { EventKind::MouseEnter } else { EventKind::MouseLeave };
        for listener in self.page.listeners_on(target, kind) {
            let event = PageEvent { listener, kind, current: target, target, key: None };
            self.dispatch(&event);
        }
    }

    /// Resolve every pending clipboard write as granted or denied.
    pub fn settle_clipboard(&mut self, granted: bool) {
        for request in self.page.take_clipboard_requests() {
            if granted {
                self.page.set_clipboard(request.text);
                self.on_copied(&request.source);
            } else {
                log::debug!("copy: clipboard write denied for {:?}", request.source);
            }
        }
    }

    fn bubble(&mut self, target: NodeId, kind: EventKind, key: Option<KeyInput>) -> Outcome {
        let mut outcome = Outcome::PassThrough;
        let path = if kind.bubbles() { self.page.event_path(target) } else { vec![target] };
        for current in path {
            // Listeners registered on `current` when the event reaches it;
            // ones removed by an earlier handler no longer fire.
            for listener in self.page.listeners_on(current, kind) {
                if !self.page.is_listening(listener) {
                    continue;
                }
                let event = PageEvent { listener, kind, current, target, key: key.clone() };
                outcome = outcome.merge(self.dispatch(&event));
            }
        }
        outcome
    }
}
