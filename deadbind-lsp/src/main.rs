//! deadbind LSP server - unused binding cleanup inside the editor.
//!
//! Provides:
//! - Diagnostics (tagged unnecessary) for unused bindings on open/change/save
//! - Code actions for the three cleanup operations
//! - `workspace/executeCommand` for the same operations
//! - Save-time edits per the `autoRemoveUnusedImports` and
//!   `autoHandleUnusedVariables` settings

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use deadbind_core::{
    analyze_source, init_structured_logging, DeadbindConfig, FileKind, Finding, Operation,
};

const SOURCE: &str = "deadbind";

/// Command identifiers, in [`Operation::ALL`] order.
const COMMANDS: [&str; 3] = [
    "deadbind.removeUnusedImports",
    "deadbind.handleUnusedVariables",
    "deadbind.cleanAll",
];

fn command_id(operation: Operation) -> &'static str {
    match operation {
        Operation::RemoveImports => COMMANDS[0],
        Operation::HandleVariables => COMMANDS[1],
        Operation::CleanAll => COMMANDS[2],
    }
}

fn operation_for_command(command: &str) -> Option<Operation> {
    Operation::ALL.into_iter().find(|op| command_id(*op) == command)
}

fn file_kind(uri: &Url) -> Option<FileKind> {
    let ext = uri.path().rsplit_once('.')?.1;
    FileKind::from_extension(ext)
}

fn file_path(uri: &Url) -> PathBuf {
    uri.to_file_path().unwrap_or_else(|_| PathBuf::from(uri.path()))
}

/// LSP position (UTF-16 columns) of a byte offset.
fn position_at(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());
    let prefix = text.get(..offset).unwrap_or(text);
    let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
    Position {
        line: prefix.matches('\n').count() as u32,
        character: prefix[line_start..].encode_utf16().count() as u32,
    }
}

/// A single edit replacing the whole document.
fn whole_document_edit(old: &str, new: String) -> TextEdit {
    TextEdit {
        range: Range {
            start: Position::new(0, 0),
            end: position_at(old, old.len()),
        },
        new_text: new,
    }
}

fn to_diagnostic(text: &str, finding: &Finding) -> Diagnostic {
    Diagnostic {
        range: Range {
            start: position_at(text, finding.start),
            end: position_at(text, finding.end),
        },
        severity: Some(DiagnosticSeverity::HINT),
        code: Some(NumberOrString::String(format!("unused-{}", finding.kind))),
        source: Some(SOURCE.to_string()),
        message: finding.message(),
        tags: Some(vec![DiagnosticTag::UNNECESSARY]),
        ..Diagnostic::default()
    }
}

/// Settings arrive either bare or nested under a `deadbind` section.
fn parse_settings(value: &Value) -> Option<DeadbindConfig> {
    #[derive(Deserialize)]
    struct Section {
        deadbind: DeadbindConfig,
    }

    if let Ok(section) = serde_json::from_value::<Section>(value.clone()) {
        return Some(section.deadbind);
    }
    serde_json::from_value(value.clone()).ok()
}

/// The operation to run before a save, if any.
fn save_operation(config: &DeadbindConfig) -> Option<Operation> {
    match (config.auto_remove_unused_imports, config.auto_handle_unused_variables) {
        (true, true) => Some(Operation::CleanAll),
        (true, false) => Some(Operation::RemoveImports),
        (false, true) => Some(Operation::HandleVariables),
        (false, false) => None,
    }
}

/// deadbind Language Server state.
struct DeadbindLsp {
    client: Client,
    /// Open documents by URI.
    documents: Arc<RwLock<HashMap<Url, String>>>,
    config: Arc<RwLock<DeadbindConfig>>,
}

impl DeadbindLsp {
    fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(RwLock::new(DeadbindConfig::default())),
        }
    }

    async fn text(&self, uri: &Url) -> Option<String> {
        self.documents.read().await.get(uri).cloned()
    }

    /// Runs `operation` on an open document. `None` when the document is
    /// unknown, unsupported, unchanged or could not be analyzed.
    async fn compute(&self, uri: &Url, operation: Operation) -> Option<TextEdit> {
        let kind = file_kind(uri)?;
        let text = self.text(uri).await?;
        let options = self.config.read().await.engine_options();

        match operation.run(&text, kind, &file_path(uri), &options) {
            Ok(Some(new_text)) => Some(whole_document_edit(&text, new_text)),
            Ok(None) => None,
            Err(e) => {
                self.log_error(&format!("{} failed for {}: {}", operation, uri, e)).await;
                None
            }
        }
    }

    async fn publish_diagnostics(&self, uri: Url) {
        let Some(kind) = file_kind(&uri) else {
            return;
        };
        let Some(text) = self.text(&uri).await else {
            return;
        };

        let diagnostics = match analyze_source(&text, kind, &file_path(&uri)) {
            Ok(findings) => findings.iter().map(|f| to_diagnostic(&text, f)).collect(),
            // A file mid-edit often does not parse; keep the editor quiet.
            Err(_) => Vec::new(),
        };
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    async fn log_info(&self, message: &str) {
        self.client.log_message(MessageType::INFO, message).await;
    }

    async fn log_error(&self, message: &str) {
        self.client.log_message(MessageType::ERROR, message).await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for DeadbindLsp {
    async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
        if let Some(config) = params.initialization_options.as_ref().and_then(parse_settings) {
            *self.config.write().await = config;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        will_save_wait_until: Some(true),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(false),
                        })),
                        ..Default::default()
                    },
                )),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
                    ..Default::default()
                }),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: "deadbind-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.log_info("deadbind LSP server initialized").await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        if file_kind(&uri).is_none() {
            return;
        }
        self.documents
            .write()
            .await
            .insert(uri.clone(), params.text_document.text);
        self.publish_diagnostics(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        {
            let mut documents = self.documents.write().await;
            match documents.get_mut(&uri) {
                Some(text) => *text = change.text,
                None => return,
            }
        }
        self.publish_diagnostics(uri).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.publish_diagnostics(params.text_document.uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.write().await.remove(&uri);
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        match parse_settings(&params.settings) {
            Some(config) => {
                *self.config.write().await = config;
                self.log_info("deadbind settings updated").await;
            }
            None => self.log_error("Ignoring unreadable deadbind settings").await,
        }
    }

    async fn code_action(&self, params: CodeActionParams) -> LspResult<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;
        let mut actions = Vec::new();

        for operation in Operation::ALL {
            let Some(edit) = self.compute(&uri, operation).await else {
                continue;
            };
            let kind = match operation {
                Operation::RemoveImports => CodeActionKind::SOURCE_ORGANIZE_IMPORTS,
                _ => CodeActionKind::SOURCE,
            };
            actions.push(CodeActionOrCommand::CodeAction(CodeAction {
                title: operation.title().to_string(),
                kind: Some(kind),
                edit: Some(WorkspaceEdit::new(HashMap::from([(uri.clone(), vec![edit])]))),
                ..CodeAction::default()
            }));
        }

        Ok((!actions.is_empty()).then_some(actions))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> LspResult<Option<Value>> {
        let Some(operation) = operation_for_command(&params.command) else {
            self.log_error(&format!("Unknown command: {}", params.command)).await;
            return Ok(None);
        };
        let uri = params
            .arguments
            .first()
            .and_then(Value::as_str)
            .and_then(|s| Url::parse(s).ok());
        let Some(uri) = uri else {
            self.log_error(&format!("{} expects a document URI argument", params.command)).await;
            return Ok(None);
        };

        let Some(edit) = self.compute(&uri, operation).await else {
            self.log_info(&format!("{}: nothing to change", operation.title())).await;
            return Ok(None);
        };
        let workspace_edit = WorkspaceEdit::new(HashMap::from([(uri, vec![edit])]));
        if let Err(e) = self.client.apply_edit(workspace_edit).await {
            self.log_error(&format!("applyEdit failed: {}", e)).await;
        }
        Ok(None)
    }

    async fn will_save_wait_until(
        &self,
        params: WillSaveTextDocumentParams,
    ) -> LspResult<Option<Vec<TextEdit>>> {
        let Some(operation) = save_operation(&*self.config.read().await) else {
            return Ok(None);
        };
        Ok(self
            .compute(&params.text_document.uri, operation)
            .await
            .map(|edit| vec![edit]))
    }
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] deadbind-lsp internal error: {}", info);
    }));

    // Logs go to stderr; stdout carries the protocol.
    init_structured_logging();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(DeadbindLsp::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
