pub mod delivery_note;
pub mod invoice;
pub mod order;
pub mod payment;
pub mod receipt;
pub mod stock_item;
