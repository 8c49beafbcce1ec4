/// Data shared between the controller and its states, invisible to anything
/// outside the HSM. Kept behind a `RefCell` on the owning controller rather
/// than handed out by reference, so states mutate it through `&Ctx` the
/// same way every handler does.
pub(crate) struct LightHsmData {
    /// 0 = off, 100 = fully on.
    pub(crate) light_percentage: u8,
    pending: Option<PendingAdjustment>,

    pub(crate) top_enter_count: u16,
    pub(crate) top_exit_count: u16,
    pub(crate) on_enter_count: u16,
    pub(crate) on_exit_count: u16,
    pub(crate) off_enter_count: u16,
    pub(crate) off_exit_count: u16,
    pub(crate) dimmer_enter_count: u16,
    pub(crate) dimmer_exit_count: u16,
}

#[derive(Clone, Copy)]
enum PendingAdjustment {
    Set(u8),
    Increase(u8),
    Decrease(u8),
}

impl LightHsmData {
    pub(crate) fn new() -> Self {
        Self {
            light_percentage: 0,
            pending: None,
            top_enter_count: 0,
            top_exit_count: 0,
            on_enter_count: 0,
            on_exit_count: 0,
            off_enter_count: 0,
            off_exit_count: 0,
            dimmer_enter_count: 0,
            dimmer_exit_count: 0,
        }
    }

    pub(crate) fn turn_on(&mut self) {
        self.light_percentage = 100;
    }

    pub(crate) fn turn_off(&mut self) {
        self.light_percentage = 0;
    }

    pub(crate) fn stash_set(&mut self, percentage: u8) {
        self.pending = Some(PendingAdjustment::Set(percentage.min(100)));
    }

    pub(crate) fn stash_increase(&mut self, percentage: u8) {
        self.pending = Some(PendingAdjustment::Increase(percentage));
    }

    pub(crate) fn stash_decrease(&mut self, percentage: u8) {
        self.pending = Some(PendingAdjustment::Decrease(percentage));
    }

    /// Applies whatever adjustment was stashed by the most recent event and
    /// returns the resulting percentage.
    pub(crate) fn apply_pending(&mut self) -> u8 {
        match self.pending.take() {
            Some(PendingAdjustment::Set(p)) => self.light_percentage = p,
            Some(PendingAdjustment::Increase(p)) => {
                self.light_percentage = self.light_percentage.saturating_add(p).min(100)
            }
            Some(PendingAdjustment::Decrease(p)) => {
                self.light_percentage = self.light_percentage.saturating_sub(p)
            }
            None => {}
        }
        self.light_percentage
    }

    pub(crate) fn clear_counts(&mut self) {
        self.top_enter_count = 0;
        self.top_exit_count = 0;
        self.on_enter_count = 0;
        self.on_exit_count = 0;
        self.off_enter_count = 0;
        self.off_exit_count = 0;
        self.dimmer_enter_count = 0;
        self.dimmer_exit_count = 0;
    }
}
