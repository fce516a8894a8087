pub mod delivery_notes;
pub mod documents;
pub mod invoices;
pub mod orders;
pub mod payments;
pub mod receipts;
pub mod stock;
