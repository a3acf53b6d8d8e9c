//! Compiled-in route allow-lists, one per role.
//!
//! A persisted queue is only ever followed through these lists. Anything else
//! found in the store is treated as corrupt and dropped.

use crate::types::Role;

pub const STUDENT_PATHS: &[&str] = &[
    "/student/dashboard",
    "/student/courses",
    "/student/assignments",
    "/student/grades",
    "/student/calendar",
    "/student/documents",
];

pub const INSTRUCTOR_PATHS: &[&str] = &[
    "/instructor/dashboard",
    "/instructor/courses",
    "/instructor/assignments",
    "/instructor/gradebook",
    "/instructor/calendar",
    "/instructor/documents",
];

pub const ADMIN_PATHS: &[&str] = &[
    "/admin/dashboard",
    "/admin/users",
    "/admin/courses",
    "/admin/departments",
    "/admin/reports",
    "/admin/settings",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    student: Vec<String>,
    instructor: Vec<String>,
    admin: Vec<String>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AllowList {
    /// The portal's route table.
    pub fn builtin() -> Self {
        Self::new(STUDENT_PATHS, INSTRUCTOR_PATHS, ADMIN_PATHS)
    }

    /// Lists for a host with a different route table. The three lists are
    /// expected to be disjoint.
    pub fn new<S: AsRef<str>>(student: &[S], instructor: &[S], admin: &[S]) -> Self {
        let own = |paths: &[S]| paths.iter().map(|p| p.as_ref().to_string()).collect();
        Self {
            student: own(student),
            instructor: own(instructor),
            admin: own(admin),
        }
    }

    pub fn paths_for(&self, role: Role) -> &[String] {
        match role {
            Role::Student => &self.student,
            Role::Instructor => &self.instructor,
            Role::Admin => &self.admin,
        }
    }

    /// The role whose list contains `path`.
    pub fn role_of(&self, path: &str) -> Option<Role> {
        Role::all()
            .iter()
            .copied()
            .find(|&r| self.paths_for(r).iter().any(|p| p == path))
    }

    /// The role a path belongs to: explicit list membership first, then the
    /// section prefix.
    pub fn infer_role(&self, path: &str) -> Option<Role> {
        self.role_of(path).or_else(|| Role::for_path(path))
    }

    /// First page of a role's section.
    pub fn landing(&self, role: Role) -> Option<&str> {
        self.paths_for(role).first().map(String::as_str)
    }

    pub fn contains(&self, role: Option<Role>, path: &str) -> bool {
        match role {
            Some(r) => self.paths_for(r).iter().any(|p| p == path),
            None => self.role_of(path).is_some(),
        }
    }

    /// Keep only paths on `role`'s list (or on any list when `role` is
    /// `None`), preserving order.
    pub fn sanitize(&self, role: Option<Role>, queue: &[String]) -> Vec<String> {
        queue
            .iter()
            .filter(|p| {
                let keep = self.contains(role, p);
                if !keep {
                    tracing::debug!(path = %p, "dropping path outside allow-list");
                }
                keep
            })
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
