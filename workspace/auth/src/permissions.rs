use model::entities::user;

/// Status flags and permission checks of an account.
///
/// There is no per-permission grant table: an active superuser holds every
/// permission and everyone else holds none.
pub trait Permissioned {
    fn is_active(&self) -> bool;
    fn is_staff(&self) -> bool;
    fn is_superuser(&self) -> bool;

    fn has_perm(&self, _perm: &str) -> bool {
        self.is_active() && self.is_superuser()
    }

    fn has_perms<'a>(&self, perms: impl IntoIterator<Item = &'a str>) -> bool
    where
        Self: Sized,
    {
        perms.into_iter().all(|perm| self.has_perm(perm))
    }

    fn has_module_perms(&self, _module: &str) -> bool {
        self.is_active() && self.is_superuser()
    }

    /// Whether the account may use the administrative console.
    fn can_access_admin(&self) -> bool {
        self.is_active() && self.is_staff()
    }
}

impl Permissioned for user::Model {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn is_staff(&self) -> bool {
        self.is_staff
    }

    fn is_superuser(&self) -> bool {
        self.is_superuser
    }
}
