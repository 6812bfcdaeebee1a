//! Permission model and the single visibility evaluator.
//!
//! The backend sends permissions as a `{key: bool}` map where the special
//! key `all` grants everything. Inside the client that map becomes a
//! [`PermissionSet`] of tagged [`Permission`] values. Checks here only decide
//! what the UI shows; the backend enforces access.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Wire key that grants every permission.
pub const ALL_KEY: &str = "all";

/// A single capability the backend can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    ContractsView,
    ContractsCreate,
    ContractsEdit,
    ContractsDelete,
    ContractsApprove,
    FinancialReportView,
    CompaniesManage,
    UsersManage,
    RolesManage,
    MeasurementUnitsManage,
    ApprovalLevelsManage,
    DocumentCategoriesManage,
    TasksManage,
    AuditLogsView,
    ImportItems,
}

impl Permission {
    pub const ALL: [Permission; 15] = [
        Permission::ContractsView,
        Permission::ContractsCreate,
        Permission::ContractsEdit,
        Permission::ContractsDelete,
        Permission::ContractsApprove,
        Permission::FinancialReportView,
        Permission::CompaniesManage,
        Permission::UsersManage,
        Permission::RolesManage,
        Permission::MeasurementUnitsManage,
        Permission::ApprovalLevelsManage,
        Permission::DocumentCategoriesManage,
        Permission::TasksManage,
        Permission::AuditLogsView,
        Permission::ImportItems,
    ];

    /// Key used by the backend.
    pub fn key(&self) -> &'static str {
        match self {
            Permission::ContractsView => "contracts_view",
            Permission::ContractsCreate => "contracts_create",
            Permission::ContractsEdit => "contracts_edit",
            Permission::ContractsDelete => "contracts_delete",
            Permission::ContractsApprove => "contracts_approve",
            Permission::FinancialReportView => "financial_report_view",
            Permission::CompaniesManage => "companies_manage",
            Permission::UsersManage => "users_manage",
            Permission::RolesManage => "roles_manage",
            Permission::MeasurementUnitsManage => "measurement_units_manage",
            Permission::ApprovalLevelsManage => "approval_levels_manage",
            Permission::DocumentCategoriesManage => "document_categories_manage",
            Permission::TasksManage => "tasks_manage",
            Permission::AuditLogsView => "audit_logs_view",
            Permission::ImportItems => "import_items",
        }
    }

    /// Label for the role editor.
    pub fn label(&self) -> &'static str {
        match self {
            Permission::ContractsView => "Visualizar contratos",
            Permission::ContractsCreate => "Criar contratos",
            Permission::ContractsEdit => "Editar contratos",
            Permission::ContractsDelete => "Excluir contratos",
            Permission::ContractsApprove => "Aprovar contratos",
            Permission::FinancialReportView => "Relatório financeiro",
            Permission::CompaniesManage => "Gerenciar empresas",
            Permission::UsersManage => "Gerenciar usuários",
            Permission::RolesManage => "Gerenciar perfis",
            Permission::MeasurementUnitsManage => "Gerenciar unidades de medida",
            Permission::ApprovalLevelsManage => "Gerenciar níveis de aprovação",
            Permission::DocumentCategoriesManage => "Gerenciar categorias de documentos",
            Permission::TasksManage => "Gerenciar tarefas",
            Permission::AuditLogsView => "Visualizar auditoria",
            Permission::ImportItems => "Importar itens",
        }
    }

    /// Look up a permission by its backend key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.key() == key)
    }
}

/// Permissions granted to a user or role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<BTreeMap<String, bool>>", into = "BTreeMap<String, bool>")]
pub enum PermissionSet {
    /// Grants every permission.
    All,
    /// Grants exactly the listed permissions.
    Only(BTreeSet<Permission>),
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::Only(BTreeSet::new())
    }
}

impl PermissionSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn only(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self::Only(permissions.into_iter().collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether the set grants `permission`, ignoring any master override.
    pub fn grants(&self, permission: Permission) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(&permission),
        }
    }

    /// Number of explicitly granted permissions (`None` for `All`).
    pub fn count(&self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Only(set) => Some(set.len()),
        }
    }
}

impl From<BTreeMap<String, bool>> for PermissionSet {
    fn from(map: BTreeMap<String, bool>) -> Self {
        if map.get(ALL_KEY).copied().unwrap_or(false) {
            return Self::All;
        }

        let mut granted = BTreeSet::new();
        for (key, value) in map {
            if key == ALL_KEY || !value {
                continue;
            }
            match Permission::from_key(&key) {
                Some(permission) => {
                    granted.insert(permission);
                }
                None => tracing::debug!("Ignoring unknown permission key: {}", key),
            }
        }
        Self::Only(granted)
    }
}

/// `null` on the wire grants nothing.
impl From<Option<BTreeMap<String, bool>>> for PermissionSet {
    fn from(map: Option<BTreeMap<String, bool>>) -> Self {
        map.map(Self::from).unwrap_or_default()
    }
}

impl From<PermissionSet> for BTreeMap<String, bool> {
    fn from(set: PermissionSet) -> Self {
        match set {
            PermissionSet::All => BTreeMap::from([(ALL_KEY.to_string(), true)]),
            PermissionSet::Only(granted) => granted.into_iter().map(|p| (p.key().to_string(), true)).collect(),
        }
    }
}

/// Anything the evaluator can check: a session user, or a role preview.
pub trait Principal {
    /// Global administrator flag, bypasses every check.
    fn is_master(&self) -> bool;
    fn permissions(&self) -> &PermissionSet;
}

/// What a UI module needs to be visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// No configured requirement, always visible.
    Unrestricted,
    /// The permission must be granted.
    Single(Permission),
    /// At least one of the permissions must be granted.
    AnyOf(Vec<Permission>),
}

/// Whether `user` holds `permission`.
pub fn has_permission<P: Principal + ?Sized>(user: &P, permission: Permission) -> bool {
    user.is_master() || user.permissions().grants(permission)
}

/// Whether `user` holds at least one of `permissions`. False for an empty list
/// unless the user is master or has every permission.
pub fn has_any_permission<P: Principal + ?Sized>(user: &P, permissions: &[Permission]) -> bool {
    if user.is_master() || user.permissions().is_all() {
        return true;
    }
    permissions.iter().any(|p| user.permissions().grants(*p))
}

/// Single visibility check used by every screen.
pub fn is_visible<P: Principal + ?Sized>(user: &P, requirement: &Requirement) -> bool {
    match requirement {
        Requirement::Unrestricted => true,
        Requirement::Single(permission) => has_permission(user, *permission),
        Requirement::AnyOf(permissions) => has_any_permission(user, permissions),
    }
}

/// Cards shown on the administration dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminModule {
    Contracts,
    Companies,
    Users,
    Roles,
    MeasurementUnits,
    ApprovalLevels,
    DocumentCategories,
    Tasks,
    AuditLogs,
    Import,
}

impl AdminModule {
    pub const ALL: [AdminModule; 10] = [
        AdminModule::Contracts,
        AdminModule::Companies,
        AdminModule::Users,
        AdminModule::Roles,
        AdminModule::MeasurementUnits,
        AdminModule::ApprovalLevels,
        AdminModule::DocumentCategories,
        AdminModule::Tasks,
        AdminModule::AuditLogs,
        AdminModule::Import,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AdminModule::Contracts => "Contratos",
            AdminModule::Companies => "Empresas",
            AdminModule::Users => "Usuários",
            AdminModule::Roles => "Perfis e Permissões",
            AdminModule::MeasurementUnits => "Unidades de Medida",
            AdminModule::ApprovalLevels => "Níveis de Aprovação",
            AdminModule::DocumentCategories => "Categorias de Documentos",
            AdminModule::Tasks => "Tarefas",
            AdminModule::AuditLogs => "Auditoria",
            AdminModule::Import => "Importar Itens",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AdminModule::Contracts => "Contratos e medições",
            AdminModule::Companies => "Contratantes e fornecedores",
            AdminModule::Users => "Contas e convites",
            AdminModule::Roles => "Controle de acesso",
            AdminModule::MeasurementUnits => "m², m³, un, kg...",
            AdminModule::ApprovalLevels => "Fluxo de aprovação",
            AdminModule::DocumentCategories => "Organização de documentos",
            AdminModule::Tasks => "Pendências da equipe",
            AdminModule::AuditLogs => "Histórico de alterações",
            AdminModule::Import => "Planilhas de itens",
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            AdminModule::Contracts => Requirement::AnyOf(vec![
                Permission::ContractsView,
                Permission::ContractsCreate,
                Permission::ContractsEdit,
            ]),
            AdminModule::Companies => Requirement::Single(Permission::CompaniesManage),
            AdminModule::Users => Requirement::Single(Permission::UsersManage),
            AdminModule::Roles => Requirement::Single(Permission::RolesManage),
            AdminModule::MeasurementUnits => Requirement::Single(Permission::MeasurementUnitsManage),
            AdminModule::ApprovalLevels => Requirement::Single(Permission::ApprovalLevelsManage),
            AdminModule::DocumentCategories => Requirement::Single(Permission::DocumentCategoriesManage),
            AdminModule::Tasks => Requirement::Unrestricted,
            AdminModule::AuditLogs => Requirement::Single(Permission::AuditLogsView),
            AdminModule::Import => Requirement::AnyOf(vec![Permission::ImportItems, Permission::ContractsEdit]),
        }
    }

    /// Modules `user` may see, in dashboard order.
    pub fn visible_for<P: Principal + ?Sized>(user: &P) -> Vec<AdminModule> {
        Self::ALL
            .iter()
            .copied()
            .filter(|m| is_visible(user, &m.requirement()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestUser {
        master: bool,
        permissions: PermissionSet,
    }

    impl Principal for TestUser {
        fn is_master(&self) -> bool {
            self.master
        }

        fn permissions(&self) -> &PermissionSet {
            &self.permissions
        }
    }

    fn user(master: bool, permissions: PermissionSet) -> TestUser {
        TestUser { master, permissions }
    }

    fn subsets() -> Vec<PermissionSet> {
        vec![
            PermissionSet::none(),
            PermissionSet::All,
            PermissionSet::only([Permission::ContractsView]),
            PermissionSet::only([Permission::UsersManage, Permission::RolesManage]),
        ]
    }

    #[test]
    fn test_has_permission_matches_definition() {
        for master in [false, true] {
            for set in subsets() {
                let u = user(master, set.clone());
                for p in Permission::ALL {
                    let expected = master || set.is_all() || set.grants(p);
                    assert_eq!(has_permission(&u, p), expected, "{p:?} master={master} set={set:?}");
                }
            }
        }
    }

    #[test]
    fn test_has_any_permission_matches_definition() {
        let lists: Vec<Vec<Permission>> = vec![
            vec![],
            vec![Permission::ContractsView],
            vec![Permission::CompaniesManage, Permission::RolesManage],
        ];
        for master in [false, true] {
            for set in subsets() {
                let u = user(master, set.clone());
                for list in &lists {
                    let expected = master || set.is_all() || list.iter().any(|p| set.grants(*p));
                    assert_eq!(has_any_permission(&u, list), expected);
                }
            }
        }
    }

    #[test]
    fn test_empty_any_list_is_false_without_override() {
        let u = user(false, PermissionSet::only([Permission::ContractsView]));
        assert!(!has_any_permission(&u, &[]));
        assert!(has_any_permission(&user(true, PermissionSet::none()), &[]));
        assert!(has_any_permission(&user(false, PermissionSet::All), &[]));
    }

    #[test]
    fn test_unrestricted_is_always_visible() {
        let u = user(false, PermissionSet::none());
        assert!(is_visible(&u, &Requirement::Unrestricted));
        assert!(!is_visible(&u, &Requirement::Single(Permission::UsersManage)));
    }

    #[test]
    fn test_visible_modules_for_limited_user() {
        let u = user(false, PermissionSet::only([Permission::ContractsView, Permission::AuditLogsView]));
        let modules = AdminModule::visible_for(&u);
        assert_eq!(
            modules,
            vec![AdminModule::Contracts, AdminModule::Tasks, AdminModule::AuditLogs]
        );
    }

    #[test]
    fn test_master_sees_every_module() {
        let u = user(true, PermissionSet::none());
        assert_eq!(AdminModule::visible_for(&u).len(), AdminModule::ALL.len());
    }

    #[test]
    fn test_decode_all_key() {
        let set: PermissionSet = serde_json::from_str(r#"{"all": true, "users_manage": false}"#).unwrap();
        assert_eq!(set, PermissionSet::All);
    }

    #[test]
    fn test_decode_drops_false_and_unknown_keys() {
        let set: PermissionSet =
            serde_json::from_str(r#"{"all": false, "contracts_view": true, "roles_manage": false, "legacy": true}"#)
                .unwrap();
        assert_eq!(set, PermissionSet::only([Permission::ContractsView]));
    }

    #[test]
    fn test_decode_null_grants_nothing() {
        let set: PermissionSet = serde_json::from_str("null").unwrap();
        assert_eq!(set, PermissionSet::none());
    }

    #[test]
    fn test_encode_permission_set() {
        let json = serde_json::to_value(PermissionSet::All).unwrap();
        assert_eq!(json, serde_json::json!({"all": true}));

        let json = serde_json::to_value(PermissionSet::only([Permission::TasksManage])).unwrap();
        assert_eq!(json, serde_json::json!({"tasks_manage": true}));
    }

    #[test]
    fn test_keys_are_unique_and_resolvable() {
        for p in Permission::ALL {
            assert_eq!(Permission::from_key(p.key()), Some(p));
        }
        assert_eq!(Permission::from_key(ALL_KEY), None);
    }
}
