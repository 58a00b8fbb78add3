use crate::config::PageNames;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageClass {
    Login,
    ProtectedUser,
    ProtectedAdmin,
    /// A page the router does not manage.
    Other,
}

impl PageClass {
    /// Classifies a path by substring match. The admin marker is checked first
    /// because admin page names commonly contain the dashboard marker too.
    #[must_use]
    pub fn classify(path: &str, pages: &PageNames) -> Self {
        let path = path.trim();
        if path.contains(pages.superadmin.marker.as_str()) {
            Self::ProtectedAdmin
        } else if path.contains(pages.dashboard.marker.as_str()) {
            Self::ProtectedUser
        } else if path.is_empty() || path == "/" || path.contains(pages.login.marker.as_str()) {
            Self::Login
        } else {
            Self::Other
        }
    }

    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::ProtectedUser | Self::ProtectedAdmin)
    }
}
