//! Navigable pages and the requirement table that guards them.

use crate::access::{can_access, RouteRequirement};
use crate::error::{ReceptionError, Result};
use crate::models::Session;
use std::fmt;

/// Receptions that handle quotes for patients.
const BUDGET_RECEPTIONS: [&str; 6] = ["103", "808", "108", "203", "1009", "1108"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Dashboard,
    Rooms,
    Inventory,
    Budgets,
    Gifts,
    Waitlist,
    Visits,
    Anamnesis,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Dashboard,
        Page::Rooms,
        Page::Inventory,
        Page::Budgets,
        Page::Gifts,
        Page::Waitlist,
        Page::Visits,
        Page::Anamnesis,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/dashboard",
            Page::Rooms => "/salas",
            Page::Inventory => "/estoque",
            Page::Budgets => "/orcamentos",
            Page::Gifts => "/brindes",
            Page::Waitlist => "/lista-espera",
            Page::Visits => "/visitas",
            Page::Anamnesis => "/anamneses",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Rooms => "Salas",
            Page::Inventory => "Estoque",
            Page::Budgets => "Orçamentos",
            Page::Gifts => "Brindes",
            Page::Waitlist => "Lista de Espera",
            Page::Visits => "Visitas",
            Page::Anamnesis => "Anamneses",
        }
    }

    /// Resolve a path; `/` is an alias for the dashboard.
    pub fn from_path(path: &str) -> Result<Self> {
        let path = path.trim();
        if path == "/" {
            return Ok(Page::Dashboard);
        }
        Page::ALL
            .into_iter()
            .find(|page| page.path() == path)
            .ok_or_else(|| ReceptionError::UnknownPage(path.to_string()))
    }

    pub fn requirement(&self) -> RouteRequirement {
        match self {
            Page::Dashboard | Page::Rooms => RouteRequirement::Any,
            Page::Inventory => RouteRequirement::reception("103"),
            Page::Budgets => RouteRequirement::receptions(BUDGET_RECEPTIONS),
            Page::Gifts => RouteRequirement::receptions(
                BUDGET_RECEPTIONS.into_iter().chain(std::iter::once("1002")),
            ),
            Page::Waitlist => RouteRequirement::reception("1002"),
            Page::Visits => RouteRequirement::reception("108"),
            Page::Anamnesis => RouteRequirement::reception("808"),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title(), self.path())
    }
}

/// Pages the session may open, in menu order.
pub fn visible_pages(session: Option<&Session>) -> Vec<Page> {
    Page::ALL
        .into_iter()
        .filter(|page| can_access(session, &page.requirement()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn paths_resolve() {
        for page in Page::ALL {
            assert_eq!(Page::from_path(page.path()).unwrap(), page);
        }
        assert_eq!(Page::from_path("/").unwrap(), Page::Dashboard);
        assert!(Page::from_path("/admin").is_err());
    }

    #[test]
    fn admin_sees_everything() {
        let admin = Session::admin("admin", Role::Admin);
        assert_eq!(visible_pages(Some(&admin)), Page::ALL.to_vec());
    }

    #[test]
    fn desk_1002_sees_waitlist_and_gifts() {
        let session = Session::reception("recepcao1002", "1002");
        assert_eq!(
            visible_pages(Some(&session)),
            vec![Page::Dashboard, Page::Rooms, Page::Gifts, Page::Waitlist]
        );
    }

    #[test]
    fn desk_103_sees_inventory_and_budgets() {
        let session = Session::reception("recepcao103", "103");
        assert_eq!(
            visible_pages(Some(&session)),
            vec![
                Page::Dashboard,
                Page::Rooms,
                Page::Inventory,
                Page::Budgets,
                Page::Gifts
            ]
        );
    }

    #[test]
    fn nobody_signed_in_sees_nothing() {
        assert!(visible_pages(None).is_empty());
    }
}
