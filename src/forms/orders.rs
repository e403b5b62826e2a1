use serde::Deserialize;

use crate::domain::order::{OrderStatus, UnknownOrderStatus};

/// Status buttons on the admin order list.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeOrderStatusForm {
    pub status: String,
}

impl ChangeOrderStatusForm {
    /// Requested status; unknown values are an error rather than `new`.
    pub fn target_status(&self) -> Result<OrderStatus, UnknownOrderStatus> {
        self.status.parse()
    }
}
