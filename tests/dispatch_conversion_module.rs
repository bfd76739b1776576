use actplay::config::ToolDocument;
use actplay::dispatch::{CancellationToken, DispatchError, TypeConverter};
use actplay::shared::logging::EventLog;
use actplay::tools::ToolSession;
use actplay::transport::{RemoteTransport, TransportError};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;

struct FakeTransport {
    responses: BTreeMap<String, Value>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakeTransport {
    fn new(responses: &[(&str, Value)]) -> Self {
        Self {
            responses: responses
                .iter()
                .map(|(url, value)| (url.to_string(), value.clone()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl RemoteTransport for FakeTransport {
    fn fetch_document(&self, url: &str) -> Result<String, TransportError> {
        Err(TransportError::Network {
            url: url.to_string(),
            message: "not served".to_string(),
        })
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((url.to_string(), body.clone()));
        self.responses.get(url).cloned().ok_or_else(|| TransportError::Network {
            url: url.to_string(),
            message: "no route".to_string(),
        })
    }
}

fn function(id: &str, params: &[(&str, &str)], return_type: &str) -> Value {
    json!({
        "id": id,
        "parameters": params
            .iter()
            .map(|(name, ty)| json!({ "name": name, "type": ty }))
            .collect::<Vec<_>>(),
        "returnType": return_type,
        "path": format!("http://tools/{id}")
    })
}

fn session(functions: Vec<Value>) -> ToolSession {
    let raw = json!({
        "tool": { "id": "conversion", "name": "Conversion", "functions": functions, "panelDefs": [] }
    })
    .to_string();
    ToolSession::from_tools(vec![ToolDocument::parse(&raw, "conversion.json").expect("tool").tool])
}

#[test]
fn convert_uses_the_single_input_function_and_reads_data() {
    let tools = session(vec![function("emfatic2ecore", &[("emfatic", "emfatic")], "ecore")]);
    let transport = FakeTransport::new(&[("http://tools/emfatic2ecore", json!({ "data": "ECORE" }))]);
    let log = EventLog::disabled();
    let token = CancellationToken::new();

    let converted = TypeConverter::new(&tools, &transport, &log, &token)
        .convert("package p;", "emfatic", "ecore")
        .expect("convert");

    assert_eq!(converted, "ECORE");
    assert_eq!(transport.calls()[0].1, json!({ "emfatic": "package p;" }));
}

#[test]
fn convert_falls_back_to_the_target_type_key() {
    let tools = session(vec![function("emfatic2ecore", &[("emfatic", "emfatic")], "ecore")]);
    let transport = FakeTransport::new(&[("http://tools/emfatic2ecore", json!({ "ecore": "ECORE" }))]);
    let log = EventLog::disabled();
    let token = CancellationToken::new();

    let converted = TypeConverter::new(&tools, &transport, &log, &token)
        .convert("package p;", "emfatic", "ecore")
        .expect("convert");

    assert_eq!(converted, "ECORE");
}

#[test]
fn convert_without_a_registered_function_is_no_conversion() {
    let tools = session(vec![function("emfatic2ecore", &[("emfatic", "emfatic")], "ecore")]);
    let transport = FakeTransport::new(&[]);
    let log = EventLog::disabled();
    let token = CancellationToken::new();

    let err = TypeConverter::new(&tools, &transport, &log, &token)
        .convert("x", "flexmi", "ecore")
        .expect_err("no function");

    assert!(matches!(err, DispatchError::NoConversion { .. }));
    assert!(transport.calls().is_empty());
}

#[test]
fn metamodel_conversion_prefers_a_direct_second_input_match() {
    let tools = session(vec![
        function("flexmi2xmiEcore", &[("flexmi", "flexmi"), ("ecore", "ecore")], "xmi"),
        function("flexmi2xmiEmfatic", &[("flexmi", "flexmi"), ("emfatic", "emfatic")], "xmi"),
        function("emfatic2ecore", &[("emfatic", "emfatic")], "ecore"),
    ]);
    let transport = FakeTransport::new(&[
        ("http://tools/flexmi2xmiEmfatic", json!({ "data": "XMI" })),
        ("http://tools/flexmi2xmiEcore", json!({ "data": "WRONG" })),
    ]);
    let log = EventLog::disabled();
    let token = CancellationToken::new();

    let converted = TypeConverter::new(&tools, &transport, &log, &token)
        .convert_including_metamodel("<m/>", "flexmi", "package p;", "emfatic", "xmi")
        .expect("convert");

    assert_eq!(converted, "XMI");
    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "http://tools/flexmi2xmiEmfatic");
    assert_eq!(calls[0].1, json!({ "flexmi": "<m/>", "emfatic": "package p;" }));
}

#[test]
fn metamodel_conversion_bridges_the_dependency_with_one_extra_call() {
    let tools = session(vec![
        function("flexmi2xmi", &[("flexmi", "flexmi"), ("ecore", "ecore")], "xmi"),
        function("emfatic2ecore", &[("emfatic", "emfatic")], "ecore"),
    ]);
    let transport = FakeTransport::new(&[
        ("http://tools/emfatic2ecore", json!({ "data": "ECORE" })),
        ("http://tools/flexmi2xmi", json!({ "data": "XMI" })),
    ]);
    let log = EventLog::disabled();
    let token = CancellationToken::new();

    let converted = TypeConverter::new(&tools, &transport, &log, &token)
        .convert_including_metamodel("<m/>", "flexmi", "package p;", "emfatic", "xmi")
        .expect("convert");

    assert_eq!(converted, "XMI");
    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "http://tools/emfatic2ecore");
    assert_eq!(calls[1].1, json!({ "flexmi": "<m/>", "ecore": "ECORE" }));
}

#[test]
fn metamodel_conversion_without_a_path_is_no_conversion() {
    let tools = session(vec![function(
        "flexmi2xmi",
        &[("flexmi", "flexmi"), ("ecore", "ecore")],
        "xmi",
    )]);
    let transport = FakeTransport::new(&[]);
    let log = EventLog::disabled();
    let token = CancellationToken::new();

    let err = TypeConverter::new(&tools, &transport, &log, &token)
        .convert_including_metamodel("<m/>", "flexmi", "package p;", "emfatic", "xmi")
        .expect_err("no bridge from emfatic");

    assert_eq!(
        err,
        DispatchError::NoConversion {
            input_types: "flexmi, emfatic".to_string(),
            target_type: "xmi".to_string(),
        }
    );
    assert!(transport.calls().is_empty());
}

#[test]
fn cancelled_token_stops_conversion_before_the_call() {
    let tools = session(vec![function("emfatic2ecore", &[("emfatic", "emfatic")], "ecore")]);
    let transport = FakeTransport::new(&[("http://tools/emfatic2ecore", json!({ "data": "ECORE" }))]);
    let log = EventLog::disabled();
    let token = CancellationToken::new();
    token.cancel();

    let err = TypeConverter::new(&tools, &transport, &log, &token)
        .convert("package p;", "emfatic", "ecore")
        .expect_err("cancelled");

    assert_eq!(err, DispatchError::Cancelled);
    assert!(transport.calls().is_empty());
}
