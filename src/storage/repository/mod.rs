pub mod item_repo;
pub mod profile_repo;
pub mod qr_repo;
pub mod report_repo;

pub use item_repo::{ItemRepository, NewItem};
pub use profile_repo::{NewProfile, ProfileRepository, ProfileTotals};
pub use qr_repo::{NewQrCode, QrCodeRepository, QrListingRow, DEFAULT_QR_LOCATION};
pub use report_repo::{NewReport, ReportDto, ReportRepository};
