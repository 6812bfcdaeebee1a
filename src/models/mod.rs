//! Backend resource DTOs and input payloads.

pub mod audit;
pub mod catalog;
pub mod company;
pub mod contract;
pub mod favorite;
pub mod import;
pub mod role;
pub mod session;
pub mod task;
pub mod user;

pub use audit::{AuditLog, AuditPage, AuditQuery};
pub use catalog::{ApprovalLevel, ApprovalLevelInput, DocumentCategory, DocumentCategoryInput, MeasurementUnit, MeasurementUnitInput};
pub use company::{Company, CompanyInput};
pub use contract::{ApprovalDecision, ApprovalStep, Contract, ContractEvent, ContractInput, ContractStatus, FinancialReport};
pub use favorite::{FavoriteStatus, ToggleFavorite};
pub use import::{FieldMapping, ImportPreview, ImportRequest, ImportResult, PreviewRow, RowIssue, TargetField};
pub use role::{Role, RoleInput};
pub use session::{LoginRequest, LoginResponse, SessionUser};
pub use task::{Task, TaskInput, TaskPriority};
pub use user::{InviteUser, User, UserInput};
