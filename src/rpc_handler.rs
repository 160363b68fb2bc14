//! RPC method handler for the Marktree JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested without stdio.
//! `handle_method` dispatches a method name plus JSON params to the `App`.

use std::sync::Mutex;

use crate::app::App;
use crate::managers::bookmark_store::BookmarkStoreTrait;
use crate::managers::transfer_session::TransferSession;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::bookmark;
use crate::types::export::ExportSelection;

use serde::Serialize;
use serde_json::{json, Value};

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn opt_str_param<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn selection_param(params: &Value) -> Result<ExportSelection, String> {
    let state = params.get("state").cloned().ok_or("missing state")?;
    serde_json::from_value(state).map_err(|e| format!("invalid state: {}", e))
}

fn session_items(session: &TransferSession) -> Result<Value, String> {
    to_json(session.items())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Bookmarks ───
        "bookmark.create" => {
            let title = str_param(params, "title")?;
            let url = str_param(params, "url")?;
            let parent = opt_str_param(params, "parent_id");
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let id = a.store.create_bookmark(title, url, parent).map_err(|e| e.to_string())?;
            Ok(json!({"id": id}))
        }
        "folder.create" => {
            let title = str_param(params, "title")?;
            let parent = opt_str_param(params, "parent_id");
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let id = a.store.create_folder(title, parent).map_err(|e| e.to_string())?;
            Ok(json!({"id": id}))
        }
        "bookmark.edit" => {
            let id = str_param(params, "id")?;
            let title = str_param(params, "title")?;
            let url = str_param(params, "url")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.store.edit_bookmark(id, title, url).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "folder.edit" => {
            let id = str_param(params, "id")?;
            let title = str_param(params, "title")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.store.edit_folder(id, title).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.store.delete_bookmark(id);
            Ok(json!({"ok": true}))
        }
        "bookmark.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            match opt_str_param(params, "folder_id") {
                None => to_json(a.store.bookmarks()),
                Some(folder_id) => {
                    let folder = a
                        .store
                        .find(folder_id)
                        .filter(|item| item.is_folder())
                        .ok_or_else(|| format!("folder not found: {}", folder_id))?;
                    to_json(&bookmark::display_order(folder.children()))
                }
            }
        }
        "bookmark.search" => {
            let query = opt_str_param(params, "query").unwrap_or("");
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.store.search(query))
        }
        "bookmark.import" => {
            let data = str_param(params, "data")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let remapped = a.store.import_from_json(data).map_err(|e| e.to_string())?;
            Ok(json!({"remapped": remapped}))
        }

        // ─── Export ───
        "export.begin" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            session_items(a.begin_export())
        }
        "export.toggle" => {
            let id = str_param(params, "id")?;
            let state = selection_param(params)?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let session = a.export_session_mut().map_err(|e| e.to_string())?;
            session.toggle(id, state);
            session_items(session)
        }
        "export.select_all" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let session = a.export_session_mut().map_err(|e| e.to_string())?;
            session.select_all();
            session_items(session)
        }
        "export.deselect_all" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let session = a.export_session_mut().map_err(|e| e.to_string())?;
            session.deselect_all();
            session_items(session)
        }
        "export.finish" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let data = a.finish_export().map_err(|e| e.to_string())?;
            Ok(json!({"data": data}))
        }
        "export.cancel" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.cancel_export()}))
        }

        // ─── Import ───
        "import.begin" => {
            let data = str_param(params, "data")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let session = a.begin_import(data).map_err(|e| e.to_string())?;
            session_items(session)
        }
        "import.toggle" => {
            let id = str_param(params, "id")?;
            let state = selection_param(params)?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let session = a.import_session_mut().map_err(|e| e.to_string())?;
            session.toggle(id, state);
            session_items(session)
        }
        "import.select_all" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let session = a.import_session_mut().map_err(|e| e.to_string())?;
            session.select_all();
            session_items(session)
        }
        "import.deselect_all" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let session = a.import_session_mut().map_err(|e| e.to_string())?;
            session.deselect_all();
            session_items(session)
        }
        "import.commit" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let remapped = a.commit_import().map_err(|e| e.to_string())?;
            Ok(json!({"remapped": remapped}))
        }
        "import.cancel" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.cancel_import()}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(a.settings_engine.get_settings())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let restart_required = a.set_setting(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "restart_required": restart_required}))
        }

        // ─── Storage ───
        "storage.status" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"persisting": a.store.is_persisting()}))
        }
        "storage.overwrite" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.store.overwrite_storage().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
