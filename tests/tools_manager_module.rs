use actplay::config::{default_port_paths, UrlRewriter};
use actplay::shared::logging::EventLog;
use actplay::tools::{ToolError, ToolManager, TypeToken};
use actplay::transport::{RemoteTransport, TransportError};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

struct DocumentServer {
    documents: BTreeMap<String, (Duration, String)>,
    fetched: Mutex<Vec<String>>,
}

impl DocumentServer {
    fn new(documents: &[(&str, u64, Value)]) -> Self {
        Self {
            documents: documents
                .iter()
                .map(|(url, delay_ms, doc)| {
                    (
                        url.to_string(),
                        (Duration::from_millis(*delay_ms), doc.to_string()),
                    )
                })
                .collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }
}

impl RemoteTransport for DocumentServer {
    fn fetch_document(&self, url: &str) -> Result<String, TransportError> {
        self.fetched.lock().expect("fetched lock").push(url.to_string());
        let Some((delay, body)) = self.documents.get(url) else {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: 404,
                body: "not found".to_string(),
            });
        };
        thread::sleep(*delay);
        Ok(body.clone())
    }

    fn post_json(&self, url: &str, _body: &Value) -> Result<Value, TransportError> {
        Err(TransportError::Network {
            url: url.to_string(),
            message: "not a function endpoint".to_string(),
        })
    }
}

fn tool(id: &str, function_id: &str, input: &str, output: &str, path: &str) -> Value {
    json!({
        "tool": {
            "id": id,
            "name": id,
            "functions": [{
                "id": function_id,
                "parameters": [{ "name": "input", "type": input }],
                "returnType": output,
                "path": path
            }],
            "panelDefs": [{ "id": format!("{id}-panel"), "name": id }]
        }
    })
}

fn rewriter() -> UrlRewriter {
    UrlRewriter::new(
        "http://play.test",
        default_port_paths(),
        BTreeMap::from([("tools".to_string(), "http://raw.test/tools/".to_string())]),
    )
}

#[test]
fn tool_manager_waits_for_every_fetch_before_indexing() {
    let server = DocumentServer::new(&[
        (
            "http://play.test/tools/epsilon/services/epsilon.json",
            60,
            tool("epsilon", "runEol", "eol", "text", "{{BASE-URL}}:8070/runEol"),
        ),
        (
            "http://raw.test/tools/emfatic.json",
            0,
            tool("emfatic", "emfatic2ecore", "emfatic", "ecore", "{{BASE-URL}}:8074/emfatic2ecore"),
        ),
    ]);
    let rewriter = rewriter();
    let log = EventLog::disabled();

    let outcome = ToolManager::new(&server, &rewriter, &log).load(&[
        "{{BASE-URL}}:8070/epsilon.json".to_string(),
        "{{ID-tools}}/emfatic.json".to_string(),
    ]);

    assert!(outcome.is_complete(), "errors: {:?}", outcome.errors);
    let session = outcome.session;
    let ids: Vec<&str> = session.tools().iter().map(|tool| tool.id.as_str()).collect();
    assert_eq!(ids, vec!["epsilon", "emfatic"]);
    assert_eq!(
        session.function("runEol").map(|function| function.path.as_str()),
        Some("http://play.test/tools/epsilon/services/runEol")
    );
    assert_eq!(
        session
            .registry()
            .find(&[TypeToken::from("emfatic")], &TypeToken::from("ecore")),
        Some("emfatic2ecore")
    );
    assert!(session.panel_definition("epsilon-panel").is_some());
}

#[test]
fn tool_manager_keeps_loaded_tools_when_one_fetch_fails() {
    let server = DocumentServer::new(&[(
        "http://raw.test/tools/emfatic.json",
        0,
        tool("emfatic", "emfatic2ecore", "emfatic", "ecore", "http://play.test/emfatic2ecore"),
    )]);
    let rewriter = rewriter();
    let log = EventLog::disabled();

    let outcome = ToolManager::new(&server, &rewriter, &log).load(&[
        "{{ID-tools}}/missing.json".to_string(),
        "{{ID-tools}}/emfatic.json".to_string(),
    ]);

    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(
        &outcome.errors[0],
        ToolError::Fetch {
            source: TransportError::Status { status: 404, .. },
            ..
        }
    ));
    assert!(outcome.session.tool("emfatic").is_some());
}

#[test]
fn tool_manager_reports_schema_issues_and_unknown_placeholders() {
    let server = DocumentServer::new(&[(
        "http://raw.test/tools/broken.json",
        0,
        json!({ "tool": { "id": "broken", "name": "Broken", "functions": [] } }),
    )]);
    let rewriter = rewriter();
    let log = EventLog::disabled();

    let outcome = ToolManager::new(&server, &rewriter, &log).load(&[
        "{{ID-tools}}/broken.json".to_string(),
        "{{ID-unknown}}/x.json".to_string(),
    ]);

    assert_eq!(outcome.errors.len(), 2);
    match &outcome.errors[0] {
        ToolError::Invalid { issues, .. } => {
            assert!(issues.iter().any(|issue| issue.category.label() == "required"));
        }
        other => panic!("expected schema issues, got {other:?}"),
    }
    assert!(matches!(&outcome.errors[1], ToolError::Url { .. }));
    assert!(outcome.session.tools().is_empty());
    let fetched = server.fetched.lock().expect("fetched lock").clone();
    assert_eq!(fetched, vec!["http://raw.test/tools/broken.json".to_string()]);
}

#[test]
fn tool_manager_rejects_duplicate_tool_ids() {
    let doc = tool("epsilon", "runEol", "eol", "text", "http://play.test/runEol");
    let server = DocumentServer::new(&[
        ("http://raw.test/tools/a.json", 0, doc.clone()),
        ("http://raw.test/tools/b.json", 0, doc),
    ]);
    let rewriter = rewriter();
    let log = EventLog::disabled();

    let outcome = ToolManager::new(&server, &rewriter, &log).load(&[
        "{{ID-tools}}/a.json".to_string(),
        "{{ID-tools}}/b.json".to_string(),
    ]);

    assert!(matches!(
        &outcome.errors[..],
        [ToolError::DuplicateTool { tool_id, .. }] if tool_id == "epsilon"
    ));
    assert_eq!(outcome.session.tools().len(), 1);
}
