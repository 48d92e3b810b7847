use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

/// 并发执行一组Future，同时处于执行状态的数量不超过max_parallels。
/// 返回结果与输入顺序一致。
pub async fn do_parallel_with_limit<T, F>(futures: Vec<F>, max_parallels: usize) -> Vec<T>
where
    F: Future<Output = T>,
{
    let limiter = Arc::new(Semaphore::new(max_parallels.max(1)));

    let tasks = futures.into_iter().map(|future| {
        let limiter = limiter.clone();
        async move {
            let _permit = limiter.acquire().await.ok();
            future.await
        }
    });

    join_all(tasks).await
}
