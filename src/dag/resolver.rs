// src/dag/resolver.rs

//! Status derivation for a single task.

use crate::types::TaskStatus;

/// Derive a task's status from its own `current` status and the statuses of
/// its direct dependencies.
///
/// First matching rule wins:
/// 1. `Completed` tasks stay `Completed`; completion is asserted externally
///    and never revoked by derivation.
/// 2. No dependencies: `current` is returned unchanged.
/// 3. Any dependency `Blocked`: `Blocked`.
/// 4. Every dependency `Completed`: `InProgress`.
/// 5. Otherwise: `Pending`.
///
/// The result does not depend on the order of `dependencies`.
pub fn resolve_status<I>(current: TaskStatus, dependencies: I) -> TaskStatus
where
    I: IntoIterator<Item = TaskStatus>,
{
    if current == TaskStatus::Completed {
        return current;
    }

    let mut any = false;
    let mut all_completed = true;

    for status in dependencies {
        any = true;
        match status {
            TaskStatus::Blocked => return TaskStatus::Blocked,
            TaskStatus::Completed => {}
            TaskStatus::Pending | TaskStatus::InProgress => all_completed = false,
        }
    }

    if !any {
        current
    } else if all_completed {
        TaskStatus::InProgress
    } else {
        TaskStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TaskStatus::*;

    #[test]
    fn zero_dependencies_leave_status_untouched() {
        for status in TaskStatus::ALL {
            assert_eq!(resolve_status(status, []), status);
        }
    }

    #[test]
    fn any_blocked_dependency_blocks() {
        assert_eq!(resolve_status(Pending, [Completed, Blocked]), Blocked);
        assert_eq!(resolve_status(InProgress, [Blocked, Pending]), Blocked);
    }

    #[test]
    fn all_completed_moves_to_in_progress() {
        assert_eq!(resolve_status(Pending, [Completed, Completed]), InProgress);
        assert_eq!(resolve_status(Blocked, [Completed]), InProgress);
    }

    #[test]
    fn incomplete_dependency_means_pending() {
        assert_eq!(resolve_status(InProgress, [Completed, InProgress]), Pending);
        assert_eq!(resolve_status(Blocked, [Pending]), Pending);
    }

    #[test]
    fn completed_is_never_revoked() {
        assert_eq!(resolve_status(Completed, [Blocked]), Completed);
        assert_eq!(resolve_status(Completed, [Pending]), Completed);
    }

    #[test]
    fn one_blocked_dependency_overrides_the_rest() {
        let mut deps = vec![Completed; 5];
        assert_eq!(resolve_status(Pending, deps.iter().copied()), InProgress);
        deps[3] = Blocked;
        assert_eq!(resolve_status(Pending, deps.iter().copied()), Blocked);
    }
}
