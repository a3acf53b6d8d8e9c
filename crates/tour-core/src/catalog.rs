//! Static step catalogs for every portal page that carries a tour.
//!
//! Catalog steps are candidates only. Which of them a user actually sees is
//! decided at mount time by the anchors the page has rendered.

use serde::Serialize;

use crate::allowlist::AllowList;
use crate::error::{Result, TourError};
use crate::step::Step;
use crate::types::{Placement, Role};
use crate::types::Placement::{Bottom, Left, Right, Top};

/// A page's tour: where it lives, its ids, and its candidate steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageTour {
    pub path: String,
    pub tour_id: String,
    /// Name used for the page's autostart marker.
    pub feature: String,
    pub steps: Vec<Step>,
}

struct PageEntry {
    path: &'static str,
    feature: &'static str,
    steps: &'static [(&'static str, &'static str, &'static str, Placement)],
}

impl PageEntry {
    fn build(&self) -> PageTour {
        PageTour {
            path: self.path.to_string(),
            tour_id: format!("{}-tour", self.feature),
            feature: self.feature.to_string(),
            steps: self
                .steps
                .iter()
                .map(|&(target, title, content, placement)| {
                    Step::new(target, title, content).placed(placement)
                })
                .collect(),
        }
    }
}

const PAGES: &[PageEntry] = &[
    // -- student --------------------------------------------------------------
    PageEntry {
        path: "/student/dashboard",
        feature: "student-dashboard",
        steps: &[
            (
                "#student-welcome",
                "Welcome",
                "Your term at a glance: enrolled courses, credits and standing.",
                Bottom,
            ),
            (
                "#upcoming-deadlines",
                "Upcoming deadlines",
                "Assignments and exams due in the next two weeks.",
                Left,
            ),
            (
                "#announcements",
                "Announcements",
                "Messages from your instructors and the registrar.",
                Top,
            ),
        ],
    },
    PageEntry {
        path: "/student/courses",
        feature: "student-courses",
        steps: &[
            ("#course-list", "Your courses", "Every course you are enrolled in this term.", Bottom),
            ("#course-filter", "Filter", "Narrow the list by department or term.", Right),
            (
                "#course-syllabus-link",
                "Syllabus",
                "Open a course to read its syllabus and schedule.",
                Left,
            ),
        ],
    },
    PageEntry {
        path: "/student/assignments",
        feature: "student-assignments",
        steps: &[
            (
                "#assignment-table",
                "Assignments",
                "Everything you need to hand in, sorted by due date.",
                Bottom,
            ),
            ("#submit-button", "Submit", "Upload your work before the deadline.", Left),
            (
                "#assignment-status",
                "Status",
                "See whether a submission was received and graded.",
                Top,
            ),
        ],
    },
    PageEntry {
        path: "/student/grades",
        feature: "student-grades",
        steps: &[
            ("#grade-summary", "Grade summary", "Your current average in each course.", Bottom),
            ("#gpa-card", "GPA", "Cumulative and term GPA.", Right),
            ("#transcript-download", "Transcript", "Download an unofficial transcript.", Left),
        ],
    },
    PageEntry {
        path: "/student/calendar",
        feature: "student-calendar",
        steps: &[
            ("#calendar-grid", "Calendar", "Classes, exams and deadlines in one view.", Top),
            (
                "#calendar-switcher",
                "Calendar system",
                "Switch between Gregorian and Solar Hijri dates.",
                Bottom,
            ),
            ("#event-legend", "Legend", "Colours tell classes, exams and holidays apart.", Left),
        ],
    },
    PageEntry {
        path: "/student/documents",
        feature: "student-documents",
        steps: &[
            ("#document-list", "Documents", "Certificates and letters issued to you.", Bottom),
            ("#request-document", "Request", "Ask the registrar for a new document.", Left),
        ],
    },
    // -- instructor -----------------------------------------------------------
    PageEntry {
        path: "/instructor/dashboard",
        feature: "instructor-dashboard",
        steps: &[
            (
                "#teaching-overview",
                "Teaching overview",
                "Sections you teach and their enrolment.",
                Bottom,
            ),
            ("#pending-grading", "Pending grading", "Submissions waiting for your review.", Left),
            ("#office-hours", "Office hours", "Your published office hours.", Top),
        ],
    },
    PageEntry {
        path: "/instructor/courses",
        feature: "instructor-courses",
        steps: &[
            ("#section-list", "Sections", "Every section assigned to you.", Bottom),
            ("#roster-button", "Roster", "See who is enrolled in a section.", Right),
            ("#syllabus-editor", "Syllabus", "Edit the syllabus students see.", Left),
        ],
    },
    PageEntry {
        path: "/instructor/assignments",
        feature: "instructor-assignments",
        steps: &[
            (
                "#new-assignment",
                "New assignment",
                "Create an assignment with a due date and weight.",
                Bottom,
            ),
            ("#assignment-list", "Assignments", "Everything you have published.", Top),
            ("#submission-counter", "Submissions", "How many students have handed in.", Left),
        ],
    },
    PageEntry {
        path: "/instructor/gradebook",
        feature: "instructor-gradebook",
        steps: &[
            ("#gradebook-table", "Gradebook", "Scores for every student and assignment.", Top),
            ("#grade-export", "Export", "Download grades as a spreadsheet.", Left),
            ("#publish-grades", "Publish", "Release final grades to students.", Bottom),
        ],
    },
    PageEntry {
        path: "/instructor/calendar",
        feature: "instructor-calendar",
        steps: &[
            ("#calendar-grid", "Calendar", "Your classes and exam sessions.", Top),
            ("#add-event", "Add event", "Schedule an exam or an extra session.", Left),
        ],
    },
    PageEntry {
        path: "/instructor/documents",
        feature: "instructor-documents",
        steps: &[
            ("#document-list", "Documents", "Course materials you have shared.", Bottom),
            ("#upload-document", "Upload", "Share a new file with a section.", Left),
        ],
    },
    // -- admin ----------------------------------------------------------------
    PageEntry {
        path: "/admin/dashboard",
        feature: "admin-dashboard",
        steps: &[
            ("#system-stats", "System overview", "Active users, courses and departments.", Bottom),
            ("#recent-activity", "Recent activity", "Latest changes across the portal.", Left),
            ("#quick-actions", "Quick actions", "Shortcuts for common administrative tasks.", Top),
        ],
    },
    PageEntry {
        path: "/admin/users",
        feature: "admin-users",
        steps: &[
            ("#user-table", "Users", "Every account with its role.", Bottom),
            ("#add-user", "Add user", "Create a student, instructor or admin account.", Left),
            ("#role-filter", "Role filter", "Show a single role at a time.", Right),
        ],
    },
    PageEntry {
        path: "/admin/courses",
        feature: "admin-courses",
        steps: &[
            (
                "#course-catalog",
                "Course catalog",
                "All courses offered by the institution.",
                Bottom,
            ),
            ("#add-course", "Add course", "Define a new course and its credits.", Left),
            ("#assign-instructor", "Assign instructor", "Attach instructors to sections.", Right),
        ],
    },
    PageEntry {
        path: "/admin/departments",
        feature: "admin-departments",
        steps: &[
            ("#department-list", "Departments", "Academic departments and their heads.", Bottom),
            ("#add-department", "Add department", "Create a department.", Left),
        ],
    },
    PageEntry {
        path: "/admin/reports",
        feature: "admin-reports",
        steps: &[
            (
                "#report-picker",
                "Reports",
                "Enrolment, grade distribution and activity reports.",
                Bottom,
            ),
            ("#report-export", "Export", "Download a report as CSV or PDF.", Left),
        ],
    },
    PageEntry {
        path: "/admin/settings",
        feature: "admin-settings",
        steps: &[
            ("#term-settings", "Terms", "Configure academic terms and their dates.", Bottom),
            ("#locale-settings", "Locale", "Default language and calendar system.", Right),
            ("#feature-flags", "Feature flags", "Turn optional portal features on or off.", Left),
        ],
    },
];

/// Catalog entry for `path`, if that page has a tour.
pub fn page(path: &str) -> Option<PageTour> {
    PAGES.iter().find(|p| p.path == path).map(PageEntry::build)
}

/// Like [`page`], but an unregistered path is an error.
pub fn require(path: &str) -> Result<PageTour> {
    page(path).ok_or_else(|| TourError::UnknownPage(path.to_string()))
}

pub fn pages_for(role: Role) -> Vec<PageTour> {
    PAGES
        .iter()
        .filter(|p| Role::for_path(p.path) == Some(role))
        .map(PageEntry::build)
        .collect()
}

pub fn all_pages() -> Vec<PageTour> {
    PAGES.iter().map(PageEntry::build).collect()
}

/// Canonical page order for a role's full walkthrough: allow-list order,
/// restricted to pages that have a tour.
pub fn full_sequence(role: Role) -> Vec<String> {
    AllowList::builtin()
        .paths_for(role)
        .iter()
        .filter(|p| PAGES.iter().any(|e| e.path == p.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;

    #[test]
    fn every_page_is_allow_listed_and_well_formed() {
        let allow = AllowList::builtin();
        for page in all_pages() {
            assert!(allow.role_of(&page.path).is_some(), "{}", page.path);
            keys::validate_id(&page.tour_id).unwrap();
            keys::validate_id(&page.feature).unwrap();
            assert!(!page.steps.is_empty(), "{}", page.path);
        }
    }

    #[test]
    fn tour_ids_are_unique() {
        let mut ids: Vec<String> = all_pages().into_iter().map(|p| p.tour_id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn full_sequence_follows_allow_list_order() {
        let seq = full_sequence(Role::Instructor);
        assert_eq!(seq.first().map(String::as_str), Some("/instructor/dashboard"));
        assert_eq!(seq.len(), pages_for(Role::Instructor).len());
    }

    #[test]
    fn unknown_page_has_no_tour() {
        assert!(page("/student/messages").is_none());
        assert!(matches!(
            require("/student/messages"),
            Err(TourError::UnknownPage(_))
        ));
    }
}
