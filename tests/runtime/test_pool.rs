//! Tests for worker pool handles.

use storo_method::{AsyncTask, PoolConfig, RuntimeError, WorkerPool};

#[test]
fn test_current_outside_runtime() {
    let err = WorkerPool::current().unwrap_err();
    assert!(matches!(err, RuntimeError::NoRuntime));
}

#[tokio::test]
async fn test_current_inside_runtime() {
    let pool = WorkerPool::current().unwrap();
    assert!(!pool.is_dedicated());
}

#[test]
fn test_from_handle_uses_callers_runtime() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .build()
        .unwrap();
    let pool = WorkerPool::from_handle(runtime.handle().clone());
    assert!(!pool.is_dedicated());

    let value = runtime.block_on(AsyncTask::spawn_on(&pool, || 7)).unwrap();
    assert_eq!(value, 7);
}

#[test]
fn test_dedicated_pool_thread_names() {
    let config = PoolConfig {
        thread_name: "pool-test-io".to_string(),
        ..PoolConfig::default()
    };
    let pool = WorkerPool::with_config(&config).unwrap();
    assert!(pool.is_dedicated());

    let task = AsyncTask::spawn_on(&pool, || {
        std::thread::current().name().map(str::to_string)
    });
    let name = pool.handle().block_on(task).unwrap();
    assert_eq!(name.as_deref(), Some("pool-test-io"));
}

#[test]
fn test_invalid_config_rejected_before_build() {
    let config = PoolConfig {
        max_blocking_threads: 0,
        ..PoolConfig::default()
    };
    let err = WorkerPool::with_config(&config).unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_dedicated_pool_dropped_inside_async_context() {
    let pool = WorkerPool::with_config(&PoolConfig::default()).unwrap();
    let clone = pool.clone();
    let value = AsyncTask::spawn_on(&clone, || 1).await.unwrap();
    assert_eq!(value, 1);
    drop(pool);
    drop(clone);
}
