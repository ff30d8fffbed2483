use super::error::TaskError;
use super::model::{CreateTaskPayload, RawTaskId, Task};
use super::store::TaskStore;

/// Load every task, newest first (pure domain logic, no HTTP)
pub async fn list_tasks(store: &dyn TaskStore) -> Result<Vec<Task>, TaskError> {
    store.list().await
}

/// Create a new task from the submitted text
pub async fn create_task(
    store: &dyn TaskStore,
    payload: CreateTaskPayload,
) -> Result<Task, TaskError> {
    let text = payload.task.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(TaskError::task_required());
    }

    store.insert(text).await
}

/// Flip the completed flag of an existing task
pub async fn toggle_task(store: &dyn TaskStore, id: i64) -> Result<(), TaskError> {
    if store.toggle_completed(id).await? {
        Ok(())
    } else {
        Err(TaskError::not_found())
    }
}

/// Delete an existing task
pub async fn delete_task(store: &dyn TaskStore, id: i64) -> Result<(), TaskError> {
    if store.delete(id).await? {
        Ok(())
    } else {
        Err(TaskError::not_found())
    }
}

/// Turn the submitted id field into a row id.
///
/// Missing, empty or zero ids are rejected as required. Text is cast the way
/// the old PHP endpoints did: leading sign and digits count, the rest is
/// ignored, and text with no leading digits becomes 0, which matches no row.
pub fn parse_task_id(raw: Option<&RawTaskId>) -> Result<i64, TaskError> {
    let id = match raw {
        None => return Err(TaskError::id_required()),
        Some(RawTaskId::Number(n)) => *n,
        // `as` truncates toward zero and saturates
        Some(RawTaskId::Float(f)) => *f as i64,
        Some(RawTaskId::Text(s)) => match s.trim() {
            "" | "0" => return Err(TaskError::id_required()),
            s => leading_int(s),
        },
    };

    match raw {
        Some(RawTaskId::Text(_)) => Ok(id),
        _ if id == 0 => Err(TaskError::id_required()),
        _ => Ok(id),
    }
}

fn leading_int(s: &str) -> i64 {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            let d = i64::from(d - b'0');
            if negative {
                acc.saturating_mul(10).saturating_sub(d)
            } else {
                acc.saturating_mul(10).saturating_add(d)
            }
        })
}
