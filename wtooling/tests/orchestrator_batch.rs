use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wtooling::{
    BatchMode, CallRequest, CallResult, ToolContract, ToolError, ToolExecutor, ToolHandler,
    ToolOrchestrator, ToolOutput, ToolRegistry, format_results,
};

fn registry() -> Arc<ToolRegistry> {
    let registry = ToolRegistry::new();
    let schema = json!({
        "type": "object",
        "properties": {"message": {"type": "string"}},
        "required": ["message"]
    });

    registry
        .register(
            ToolContract::new("echo", "Echo a message", schema.clone()),
            ToolHandler::sync(|args, _ctx| {
                Ok(ToolOutput::from(args.get("message").cloned().unwrap_or_default()))
            }),
            false,
        )
        .expect("echo");
    registry
        .register(
            ToolContract::new("stats", "Structured payload", json!({"type": "object", "properties": {}})),
            ToolHandler::sync(|_args, _ctx| Ok(ToolOutput::from(json!({"files": 3, "ok": true})))),
            false,
        )
        .expect("stats");
    registry
        .register(
            ToolContract::new("nothing", "Returns null", json!({"type": "object", "properties": {}})),
            ToolHandler::sync(|_args, _ctx| Ok(ToolOutput::from(serde_json::Value::Null))),
            false,
        )
        .expect("nothing");
    registry
        .register(
            ToolContract::new("fails", "Always fails", json!({"type": "object", "properties": {}})),
            ToolHandler::sync(|_args, _ctx| {
                Err(ToolError::from(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "access denied",
                )))
            }),
            false,
        )
        .expect("fails");
    registry
        .register(
            ToolContract::new("stall", "Never finishes in time", json!({"type": "object", "properties": {}}))
                .asynchronous()
                .with_timeout(Duration::from_millis(50)),
            ToolHandler::from_async(|_args, _ctx| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(ToolOutput::from("late"))
            }),
            false,
        )
        .expect("stall");

    Arc::new(registry)
}

fn request(id: &str, name: &str, arguments: serde_json::Value) -> CallRequest {
    CallRequest::new(id, name, arguments.as_object().cloned().unwrap_or_default())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_tool_becomes_an_error_result() {
    let orchestrator = ToolOrchestrator::new(registry(), Arc::new(ToolExecutor::default()));

    let results = orchestrator
        .execute_batch(vec![request("toolu_1", "ghost", json!({}))])
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_error);
    assert!(results[0].content.contains("ghost"));
    assert_eq!(results[0].request_id, "toolu_1");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn mixed_batch_keeps_order_and_renders_every_outcome() {
    for mode in [BatchMode::Sequential, BatchMode::Concurrent] {
        let orchestrator = ToolOrchestrator::new(registry(), Arc::new(ToolExecutor::default()))
            .with_concurrency(mode);

        let results = orchestrator
            .execute_batch(vec![
                request("1", "stall", json!({})),
                request("2", "echo", json!({"message": "hi"})),
                request("3", "echo", json!({})),
                request("4", "stats", json!({})),
                request("5", "fails", json!({})),
                request("6", "nothing", json!({})),
            ])
            .await;

        let ids: Vec<&str> = results.iter().map(|result| result.request_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"], "mode {mode:?}");

        assert!(results[0].is_error);
        assert!(results[0].content.starts_with("Execution error: TimeoutError:"));

        assert_eq!(results[1], CallResult::success("2", "hi"));

        assert!(results[2].is_error);
        assert!(results[2].content.starts_with("Execution error: ValidationError:"));

        assert_eq!(results[3].content, "{\n  \"files\": 3,\n  \"ok\": true\n}");

        assert!(results[4].is_error);
        assert_eq!(
            results[4].content,
            "tool 'fails' execution failed: io::PermissionDenied: access denied"
        );

        assert_eq!(results[5], CallResult::success("6", "Success"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn results_convert_into_tool_result_blocks() {
    let orchestrator = ToolOrchestrator::new(registry(), Arc::new(ToolExecutor::default()));
    let call = CallRequest::from_json("toolu_9", "echo", r#"{"message":"round trip"}"#)
        .expect("arguments should parse");

    let results = orchestrator.execute_batch(vec![call]).await;
    assert_eq!(
        format_results(&results),
        vec![json!({
            "type": "tool_result",
            "tool_use_id": "toolu_9",
            "content": "round trip",
            "is_error": false
        })]
    );
}
