//! Role-tagged dashboard navigation.

use crate::domain::Role;

const EVERYONE: &[Role] = &[Role::User, Role::Admin, Role::Moderator];
const USERS: &[Role] = &[Role::User];
const ADMINS: &[Role] = &[Role::Admin];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
    pub active_icon: Option<&'static str>,
    pub badge: Option<u32>,
    pub roles: &'static [Role],
}

impl NavItem {
    pub fn visible_to(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

pub const COMMON_NAV_ITEMS: &[NavItem] = &[
    NavItem {
        name: "Dashboard",
        href: "/dashboard",
        icon: "home-outline",
        active_icon: Some("home-solid"),
        badge: None,
        roles: EVERYONE,
    },
    NavItem {
        name: "Profile",
        href: "/dashboard/profile",
        icon: "users-outline",
        active_icon: Some("users-solid"),
        badge: None,
        roles: EVERYONE,
    },
    NavItem {
        name: "Notifications",
        href: "/dashboard/notifications",
        icon: "notification-outline",
        active_icon: None,
        badge: Some(3),
        roles: EVERYONE,
    },
];

pub const USER_NAV_ITEMS: &[NavItem] = &[
    NavItem {
        name: "My Orders",
        href: "/dashboard/orders",
        icon: "cart-outline",
        active_icon: Some("cart-solid"),
        badge: None,
        roles: USERS,
    },
    NavItem {
        name: "Documents",
        href: "/dashboard/documents",
        icon: "documents-outline",
        active_icon: Some("documents-solid"),
        badge: None,
        roles: USERS,
    },
    NavItem {
        name: "Billing",
        href: "/dashboard/billing",
        icon: "billing-outline",
        active_icon: None,
        badge: None,
        roles: USERS,
    },
];

pub const ADMIN_NAV_ITEMS: &[NavItem] = &[
    NavItem {
        name: "Admin Panel",
        href: "/dashboard",
        icon: "admin-outline",
        active_icon: Some("admin-solid"),
        badge: None,
        roles: ADMINS,
    },
    NavItem {
        name: "Analytics",
        href: "/dashboard/analytics",
        icon: "analytics-outline",
        active_icon: Some("analytics-solid"),
        badge: None,
        roles: ADMINS,
    },
    NavItem {
        name: "User Management",
        href: "/user-management",
        icon: "users-outline",
        active_icon: Some("users-solid"),
        badge: None,
        roles: ADMINS,
    },
    NavItem {
        name: "Book Management",
        href: "/book-management",
        icon: "inventory-outline",
        active_icon: None,
        badge: None,
        roles: ADMINS,
    },
    NavItem {
        name: "Settings",
        href: "/dashboard/admin/settings",
        icon: "settings-outline",
        active_icon: Some("settings-solid"),
        badge: None,
        roles: ADMINS,
    },
];

/// Items shown in the dashboard menu. Without a role only the common items are
/// listed; otherwise the common items plus the role's own, filtered to the role.
pub fn nav_items_for_role(role: Option<Role>) -> Vec<NavItem> {
    let Some(role) = role else {
        return COMMON_NAV_ITEMS.to_vec();
    };

    let role_items: &[NavItem] = match role {
        Role::User => USER_NAV_ITEMS,
        Role::Admin => ADMIN_NAV_ITEMS,
        Role::Moderator => &[],
    };

    COMMON_NAV_ITEMS
        .iter()
        .chain(role_items)
        .filter(|item| item.visible_to(role))
        .copied()
        .collect()
}
