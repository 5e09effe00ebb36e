//! Webviewへ公開するコマンド群。実体は管理ステートのLaunchLinkへ委譲する薄い層。

use tauri::{ipc::Channel, AppHandle, Runtime};

use crate::{LaunchLinkExt, SubscriptionId};

/// 取り込み済みの起動リンクを返す。リンク無しで起動した場合はnull。
#[tauri::command]
pub(crate) fn get_initial_link<R: Runtime>(app: AppHandle<R>) -> Result<Option<String>, String> {
    app.launch_link().initial_link().map_err(|e| e.to_string())
}

/// 新規リンクの購読を開始し、解除に使うハンドルを返す。
/// 既存の購読があれば黙って置き換わる。
#[tauri::command]
pub(crate) fn subscribe<R: Runtime>(app: AppHandle<R>, channel: Channel<String>) -> SubscriptionId {
    app.launch_link().subscribe(channel)
}

/// ハンドルの指す購読を解除する。置き換え済みの古いハンドルなら何もしない。
#[tauri::command]
pub(crate) fn unsubscribe<R: Runtime>(app: AppHandle<R>, id: SubscriptionId) -> bool {
    app.launch_link().unsubscribe(id)
}
