pub mod compliance_report;
pub mod e_waste_item;
pub mod profile;
pub mod qr_code;

