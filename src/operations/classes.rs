use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::database::Store;
use crate::error::ApiError;
use crate::model::class_item::{Class, ClassUpdate, NewClass};
use crate::model::order_item::{OrderFailure, OrderItem, OrderReport};

pub async fn list(store: &dyn Store) -> Result<Vec<Class>, ApiError> {
    store.list_classes().await
}

pub async fn create(store: &dyn Store, request: NewClass) -> Result<Class, ApiError> {
    let draft = request.validate()?;
    let class = store.insert_class(draft).await?;
    info!(class_id = class.id, "Class created: {}", class.name);
    Ok(class)
}

pub async fn update(store: &dyn Store, id: Option<i32>, changes: ClassUpdate) -> Result<Class, ApiError> {
    let Some(id) = id else {
        return Err(ApiError::Validation("Class ID is required".into()));
    };
    let changes = changes.normalize()?;

    match store.update_class(id, &changes).await? {
        Some(class) => {
            info!(class_id = id, "Class updated");
            Ok(class)
        }
        None => Err(ApiError::NotFound("Class not found".into())),
    }
}

pub async fn delete(store: &dyn Store, id: Option<i32>) -> Result<(), ApiError> {
    let Some(id) = id else {
        return Err(ApiError::Validation("Class ID is required".into()));
    };

    if !store.delete_class(id).await? {
        return Err(ApiError::NotFound("Class not found".into()));
    }
    info!(class_id = id, "Class deleted");
    Ok(())
}

/// Applies a batch of display ranks.
///
/// Every pair is written by its own task and nothing is rolled back, so a failed item leaves
/// the others in place. When an id appears more than once the last pair wins.
pub async fn reorder(store: Arc<dyn Store>, items: Vec<OrderItem>) -> OrderReport {
    let mut latest: Vec<OrderItem> = Vec::with_capacity(items.len());
    for item in items {
        match latest.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => existing.order = item.order,
            None => latest.push(item),
        }
    }

    let total = latest.len();
    let mut unresolved = latest.iter().map(|i| i.id).collect::<HashSet<i32>>();
    let mut tasks = JoinSet::new();

    for item in latest {
        let store = Arc::clone(&store);
        tasks.spawn(async move { (item.id, store.set_class_order(item.id, item.order).await) });
    }

    let mut report = OrderReport::default();
    while let Some(joined) = tasks.join_next().await {
        let (id, outcome) = match joined {
            Ok(done) => done,
            Err(e) => {
                tracing::error!("Order update task failed: {e}");
                continue;
            }
        };
        unresolved.remove(&id);

        match outcome {
            Ok(true) => report.updated.push(id),
            Ok(false) => {
                warn!(class_id = id, "Order update skipped, class not found");
                report.failed.push(OrderFailure {
                    id,
                    message: "Class not found".into(),
                });
            }
            Err(e) => {
                warn!(class_id = id, "Order update failed: {e}");
                report.failed.push(OrderFailure {
                    id,
                    message: e.body().message,
                });
            }
        }
    }

    for id in unresolved {
        report.failed.push(OrderFailure {
            id,
            message: "Update did not complete".into(),
        });
    }

    report.updated.sort_unstable();
    report.failed.sort_by_key(|f| f.id);
    report.message = if report.is_complete() {
        "Order updated successfully".into()
    } else {
        format!("{} of {} order updates failed", report.failed.len(), total)
    };

    info!(
        updated = report.updated.len(),
        failed = report.failed.len(),
        "Class order batch applied"
    );
    report
}
