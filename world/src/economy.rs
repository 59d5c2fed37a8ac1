//! Player currency and remaining lives.

/// Tracks money and lives for the active session.
#[derive(Clone, Debug)]
pub(crate) struct Ledger {
    money: u32,
    lives: i32,
    game_over_signalled: bool,
}

impl Ledger {
    pub(crate) fn new(money: u32, lives: i32) -> Self {
        Self {
            money,
            lives,
            game_over_signalled: false,
        }
    }

    pub(crate) fn money(&self) -> u32 {
        self.money
    }

    pub(crate) fn lives(&self) -> i32 {
        self.lives
    }

    /// Deducts `cost` when affordable; otherwise leaves the balance untouched.
    pub(crate) fn try_spend(&mut self, cost: u32) -> bool {
        match self.money.checked_sub(cost) {
            Some(remaining) => {
                self.money = remaining;
                true
            }
            None => false,
        }
    }

    pub(crate) fn credit(&mut self, amount: u32) -> u32 {
        self.money = self.money.saturating_add(amount);
        self.money
    }

    pub(crate) fn debit_life(&mut self) -> i32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub(crate) fn is_depleted(&self) -> bool {
        self.lives <= 0
    }

    /// Returns `true` exactly once, on the first call after lives ran out.
    pub(crate) fn take_game_over(&mut self) -> bool {
        if self.is_depleted() && !self.game_over_signalled {
            self.game_over_signalled = true;
            return true;
        }
        false
    }
}
