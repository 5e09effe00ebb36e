//! 起動リンクリレープラグイン。
//!
//! OSがアプリへ引き渡した起動リンク(カスタムスキームURL)を取り込み、
//! Webview側へ二つの経路で届ける。
//!
//! - `get_initial_link`: 起動時点のリンクを1回だけ問い合わせる
//! - `subscribe` / `unsubscribe`: 起動後に届くリンクをChannelで受け取る
//!
//! 初期リンクは起動引数から、起動後のリンクはmacOSのオープンイベントと、
//! 二重起動側インスタンスから引き渡される引数(`LaunchLink::ingest_launch_args`)
//! から取り込む。購読は常に高々1件で、リンクのキューイングはしない。

mod commands;
mod config;
mod relay;
mod source;

pub use config::Config;
pub use relay::{
    LinkRelay, LinkSubscriber, RelayError, SubscriptionId, INITIAL_LINK_OPERATION,
};

use tauri::{
    ipc::Channel,
    plugin::{Builder, TauriPlugin},
    Manager, RunEvent, Runtime, Url,
};

pub(crate) const PLUGIN_NAME: &str = "launch-link";

/// Webview購読のChannelをリレーの配信口として扱うための包み。
struct ChannelSink(Channel<String>);

impl LinkSubscriber for ChannelSink {
    fn deliver(&self, link: &str) {
        // Webview破棄などで送れなかった分は落とすだけで、呼び出し元へは返さない。
        if let Err(e) = self.0.send(link.to_string()) {
            log::warn!("Failed to deliver launch link event: {e}");
        }
    }
}

/// プラグインが管理する起動リンクAPI本体。`Manager::state`経由で取得できる。
pub struct LaunchLink {
    relay: LinkRelay,
    schemes: Vec<String>,
}

impl LaunchLink {
    fn new(config: Config) -> Self {
        Self {
            relay: LinkRelay::new(),
            schemes: config::normalize_schemes(&config.schemes),
        }
    }

    /// 起動時点のリンクを返す。リンク無しで起動していたらNone。
    /// 何度呼んでも同じ値で、購読側への配信には影響しない。
    pub fn initial_link(&self) -> Result<Option<String>, RelayError> {
        self.relay.query(INITIAL_LINK_OPERATION)
    }

    /// Channelを配信口として購読を登録し、ハンドルを返す。
    pub fn subscribe(&self, channel: Channel<String>) -> SubscriptionId {
        self.relay.subscribe(ChannelSink(channel))
    }

    /// ハンドルの指す購読を解除する。
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.relay.unsubscribe(id)
    }

    /// 新しいリンクを現在の購読者へ転送する。配信が起きたかを返す。
    pub fn publish(&self, link: &str) -> bool {
        self.relay.publish(link)
    }

    /// 二重起動側インスタンスから引き渡された引数列からリンクを拾い、
    /// 新規リンクとして購読者へ転送する。配信まで行われたらtrue。
    pub fn ingest_launch_args<I, S>(&self, args: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match source::find_launch_link(args, &self.schemes) {
            Some(link) => self.relay.publish(&link),
            None => false,
        }
    }

    /// オープンイベントで届いたURL群を順に転送する。
    pub fn open_urls(&self, urls: &[Url]) {
        for url in urls {
            let _ = self.relay.publish(url.as_str());
        }
    }

    /// フォアグラウンド文脈が閉じたときの後始末。購読だけを畳む。
    pub fn detach(&self) {
        self.relay.detach();
    }

    /// 引数列からリンクを拾い、起動時点のリンクとして確定させる。
    pub(crate) fn attach_from_args<I, S>(&self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.relay
            .attach(source::find_launch_link(args, &self.schemes));
    }
}

/// `AppHandle`などのManager実装から起動リンクAPIを引くための拡張トレイト。
pub trait LaunchLinkExt<R: Runtime> {
    fn launch_link(&self) -> &LaunchLink;
}

impl<R: Runtime, T: Manager<R>> LaunchLinkExt<R> for T {
    fn launch_link(&self) -> &LaunchLink {
        self.state::<LaunchLink>().inner()
    }
}

/// プラグインを初期化する。設定はtauri.conf.jsonの`plugins > launch-link`節から読む。
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
    Builder::<R, Option<Config>>::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![
            commands::get_initial_link,
            commands::subscribe,
            commands::unsubscribe
        ])
        .setup(|app, api| {
            let config = api.config().clone().unwrap_or_default();
            let launch_link = LaunchLink::new(config);
            // 非UTF-8の引数(Unixのパスなど)で起動を落とさないようOsString経由で読む。
            launch_link.attach_from_args(source::utf8_args(std::env::args_os().skip(1)));
            app.manage(launch_link);
            log::debug!("Launch link plugin initialized");
            Ok(())
        })
        .on_event(|app, event| {
            #[cfg(any(target_os = "macos", target_os = "ios"))]
            if let RunEvent::Opened { urls } = event {
                app.launch_link().open_urls(urls);
            }

            if let RunEvent::Exit = event {
                app.launch_link().detach();
            }
        })
        .build()
}
