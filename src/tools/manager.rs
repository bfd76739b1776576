use super::error::ToolError;
use super::session::ToolSession;
use crate::config::{DocumentFormat, Tool, ToolDocument, UrlRewriter};
use crate::shared::logging::EventLog;
use crate::transport::RemoteTransport;
use crate::validation::validate_tool_document;
use std::collections::HashSet;
use std::thread;

#[derive(Debug)]
pub struct ToolLoadOutcome {
    pub session: ToolSession,
    pub errors: Vec<ToolError>,
}

impl ToolLoadOutcome {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Loads every tool document an activity names. Fetches run concurrently but
/// `load` returns only after all of them settled, so a `ToolSession` never
/// exists in a partially indexed state.
pub struct ToolManager<'a> {
    transport: &'a dyn RemoteTransport,
    rewriter: &'a UrlRewriter,
    log: &'a EventLog,
}

impl<'a> ToolManager<'a> {
    pub fn new(transport: &'a dyn RemoteTransport, rewriter: &'a UrlRewriter, log: &'a EventLog) -> Self {
        Self {
            transport,
            rewriter,
            log,
        }
    }

    pub fn load(&self, urls: &[String]) -> ToolLoadOutcome {
        let fetched: Vec<Result<(String, Tool), ToolError>> = thread::scope(|scope| {
            let handles: Vec<_> = urls
                .iter()
                .map(|url| scope.spawn(move || self.load_one(url)))
                .collect();
            handles
                .into_iter()
                .zip(urls)
                .map(|(handle, url)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(ToolError::Fetch {
                            url: url.clone(),
                            source: crate::transport::TransportError::Network {
                                url: url.clone(),
                                message: "tool loader thread panicked".to_string(),
                            },
                        })
                    })
                })
                .collect()
        });

        let mut tools = Vec::new();
        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        for result in fetched {
            match result {
                Ok((url, tool)) => {
                    if !seen.insert(tool.id.clone()) {
                        errors.push(ToolError::DuplicateTool {
                            tool_id: tool.id,
                            url,
                        });
                        continue;
                    }
                    self.log.info(
                        "tool.loaded",
                        &format!("loaded tool `{}` with {} function(s)", tool.id, tool.functions.len()),
                        &[("toolId", &tool.id), ("url", &url)],
                    );
                    tools.push(tool);
                }
                Err(err) => {
                    self.log.error("tool.load_failed", &err.to_string(), &[]);
                    errors.push(err);
                }
            }
        }

        ToolLoadOutcome {
            session: ToolSession::from_tools(tools),
            errors,
        }
    }

    fn load_one(&self, raw_url: &str) -> Result<(String, Tool), ToolError> {
        let url = self.rewriter.rewrite(raw_url).map_err(|source| ToolError::Url {
            url: raw_url.to_string(),
            source,
        })?;
        let body = self
            .transport
            .fetch_document(&url)
            .map_err(|source| ToolError::Fetch {
                url: url.clone(),
                source,
            })?;
        let value = DocumentFormat::Json
            .parse_value(&body, &url)
            .map_err(|source| ToolError::Parse {
                url: url.clone(),
                source,
            })?;

        let issues = validate_tool_document(&value);
        if !issues.is_empty() {
            return Err(ToolError::Invalid { url, issues });
        }

        let mut tool = serde_json::from_value::<ToolDocument>(value)
            .map_err(|source| ToolError::Parse {
                url: url.clone(),
                source: crate::config::ConfigError::ParseJson {
                    path: url.clone(),
                    source,
                },
            })?
            .tool;

        for function in &mut tool.functions {
            function.path =
                self.rewriter
                    .rewrite(&function.path)
                    .map_err(|source| ToolError::FunctionPath {
                        tool_id: tool.id.clone(),
                        function_id: function.id.clone(),
                        source,
                    })?;
        }
        Ok((url, tool))
    }
}
