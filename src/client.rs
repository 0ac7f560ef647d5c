// client.rs
// Async wrapper over the TShock REST endpoints

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::defs::{BanLookupType, StatusFilters, UserLookupType};
use crate::error::RestError;
use crate::request::RequestBuilder;

const USER_AGENT: &str = concat!("rshock/", env!("CARGO_PKG_VERSION"));

// Token creation response
#[derive(Debug, Deserialize)]
struct TokenCreateResponse {
    token: String,
}

/// Async TShock REST client.
///
/// Method names follow the CRUD split the endpoints themselves make:
/// `fetch_` methods only read server state, `set_` methods update
/// persistent values, and `do_` methods trigger one-off server actions
/// (kicks, broadcasts, world events).
///
/// Every method returns the server's JSON reply as an untyped
/// [`serde_json::Value`]; TShock replies always carry a `status` member
/// and usually a `response` member. Consult the TShock REST
/// documentation for per-endpoint payloads and the permissions each
/// call requires.
///
/// Most endpoints refuse requests without a token, so
/// [`fetch_token`](TShock::fetch_token) should be the first call after
/// construction. The token is the only mutable client state; all other
/// methods take `&self` and may run concurrently on a shared client.
#[derive(Debug)]
pub struct TShock {
    config: ClientConfig,
    urls: RequestBuilder,
    http_client: reqwest::Client,
}

impl TShock {
    /// Creates a client for the REST interface described by `config`.
    pub fn new(config: ClientConfig) -> Result<Self, RestError> {
        if config.host.trim().is_empty() {
            return Err(RestError::Config("host must not be empty".to_string()));
        }
        let urls = RequestBuilder::new(&config.server_url())?;
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            config,
            urls,
            http_client,
        })
    }

    /// Shorthand for [`TShock::new`] with default timeout.
    pub fn connect(host: &str, port: u16) -> Result<Self, RestError> {
        Self::new(ClientConfig {
            host: host.to_string(),
            port,
            ..ClientConfig::default()
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The auth token currently attached to requests. Empty until
    /// [`fetch_token`](TShock::fetch_token) succeeds.
    pub fn token(&self) -> &str {
        self.urls.token()
    }

    /// Issues a GET and maps the reply onto the error taxonomy: non-2xx
    /// becomes [`RestError::Api`], an unreachable server becomes
    /// [`RestError::Transport`], and a 2xx body that is not JSON
    /// becomes [`RestError::Parse`].
    async fn make_request(&self, url: reqwest::Url) -> Result<Value, RestError> {
        debug!(path = url.path(), "dispatching REST request");
        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RestError::Api {
                status: status.as_u16(),
                message: api_message(&body),
            });
        }

        let data: Value = serde_json::from_str(&body)?;
        Ok(data)
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// Obtains a token for `user` and stores it for all later calls.
    /// Running it again replaces the stored token.
    ///
    /// **endpoint:** `/v2/token/create`
    pub async fn fetch_token(&mut self, user: &str, password: &str) -> Result<(), RestError> {
        let url = self.urls.url(
            &["v2", "token", "create"],
            &[
                ("username", user.to_string()),
                ("password", password.to_string()),
            ],
        );
        let data = self.make_request(url).await?;
        let parsed: TokenCreateResponse = serde_json::from_value(data)?;
        self.urls.set_token(&parsed.token);
        Ok(())
    }

    /// Tests whether the stored token is still valid. A rejection from
    /// the server maps to `Ok(false)`; transport and parse failures
    /// still propagate.
    ///
    /// **endpoint:** `/tokentest`
    pub async fn fetch_token_status(&self) -> Result<bool, RestError> {
        let url = self.urls.url(&["tokentest"], &[]);
        match self.make_request(url).await {
            Ok(_) => Ok(true),
            Err(RestError::Api { .. }) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// Invalidates the stored token on the server.
    ///
    /// **endpoint:** `/token/destroy/{token}`
    pub async fn do_destroy_token(&self) -> Result<Value, RestError> {
        let token = self.urls.token().to_string();
        let url = self.urls.url(&["token", "destroy", token.as_str()], &[]);
        self.make_request(url).await
    }

    /// Invalidates every token the server has issued.
    ///
    /// **endpoint:** `/v3/token/destroy/all`
    pub async fn do_destroy_all_tokens(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["v3", "token", "destroy", "all"], &[]);
        self.make_request(url).await
    }

    // ========================================================================
    // Server
    // ========================================================================

    /// Basic server status: name, port, player count, player CSV.
    ///
    /// **endpoint:** `/status`
    pub async fn fetch_status(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["status"], &[]);
        self.make_request(url).await
    }

    /// Extended server status. `players` and `rules` toggle the
    /// corresponding arrays in the reply; `filters` narrows the player
    /// list.
    ///
    /// **endpoint:** `/v2/server/status`
    pub async fn fetch_server_status_v2(
        &self,
        players: bool,
        rules: bool,
        filters: Option<&StatusFilters>,
    ) -> Result<Value, RestError> {
        let mut params = vec![
            ("players", players.to_string()),
            ("rules", rules.to_string()),
        ];
        if let Some(filters) = filters {
            filters.push_params(&mut params);
        }
        let url = self.urls.url(&["v2", "server", "status"], &params);
        self.make_request(url).await
    }

    /// Server message of the day.
    ///
    /// **endpoint:** `/v3/server/motd`
    pub async fn fetch_server_motd(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["v3", "server", "motd"], &[]);
        self.make_request(url).await
    }

    /// Server rules list.
    ///
    /// **endpoint:** `/v3/server/rules`
    pub async fn fetch_server_rules(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["v3", "server", "rules"], &[]);
        self.make_request(url).await
    }

    /// Broadcasts `message` to everyone on the server.
    ///
    /// **endpoint:** `/v2/server/broadcast`
    pub async fn do_server_broadcast(&self, message: &str) -> Result<Value, RestError> {
        let url = self
            .urls
            .url(&["v2", "server", "broadcast"], &[("msg", message.to_string())]);
        self.make_request(url).await
    }

    /// Reloads the server config file, permissions, and regions.
    ///
    /// **endpoint:** `/v3/server/reload`
    pub async fn do_server_reload(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["v3", "server", "reload"], &[]);
        self.make_request(url).await
    }

    /// Shuts the server down. `nosave` skips the world save on the way
    /// out.
    ///
    /// **endpoint:** `/v2/server/off`
    pub async fn do_server_off(&self, confirm: bool, nosave: bool) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "server", "off"],
            &[
                ("confirm", confirm.to_string()),
                ("nosave", nosave.to_string()),
            ],
        );
        self.make_request(url).await
    }

    /// Restarts the server.
    ///
    /// **endpoint:** `/v3/server/restart`
    pub async fn do_server_restart(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["v3", "server", "restart"], &[]);
        self.make_request(url).await
    }

    /// Runs a console command and returns its output in the `response`
    /// array.
    ///
    /// **endpoint:** `/v3/server/rawcmd`
    pub async fn do_server_rawcmd(&self, command: &str) -> Result<Value, RestError> {
        let url = self
            .urls
            .url(&["v3", "server", "rawcmd"], &[("cmd", command.to_string())]);
        self.make_request(url).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Users currently logged in.
    ///
    /// **endpoint:** `/v2/users/activelist`
    pub async fn fetch_active_user_list(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["v2", "users", "activelist"], &[]);
        self.make_request(url).await
    }

    /// Details of a single user, looked up by id or name.
    ///
    /// **endpoint:** `/v2/users/read`
    pub async fn fetch_user_info(
        &self,
        lookup: UserLookupType,
        user: &str,
    ) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "users", "read"],
            &[
                ("type", lookup.as_str().to_string()),
                ("user", user.to_string()),
            ],
        );
        self.make_request(url).await
    }

    /// Creates a user account in the TShock database.
    ///
    /// **endpoint:** `/v2/users/create`
    pub async fn do_create_user(
        &self,
        lookup: UserLookupType,
        user: &str,
        password: &str,
        group: &str,
    ) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "users", "create"],
            &[
                ("type", lookup.as_str().to_string()),
                ("user", user.to_string()),
                ("password", password.to_string()),
                ("group", group.to_string()),
            ],
        );
        self.make_request(url).await
    }

    /// Updates a user's password and group.
    ///
    /// **endpoint:** `/v2/users/update`
    pub async fn set_update_user(
        &self,
        user: &str,
        lookup: UserLookupType,
        password: &str,
        group: &str,
    ) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "users", "update"],
            &[
                ("user", user.to_string()),
                ("type", lookup.as_str().to_string()),
                ("password", password.to_string()),
                ("group", group.to_string()),
            ],
        );
        self.make_request(url).await
    }

    /// Moves a user into another group via the `/user group` console
    /// command, since no dedicated endpoint exists for it.
    pub async fn set_group(&self, user: &str, newgroup: &str) -> Result<Value, RestError> {
        self.do_server_rawcmd(&format!("/user group {user} {newgroup}"))
            .await
    }

    // ========================================================================
    // Players
    // ========================================================================

    /// Players currently connected to the server.
    ///
    /// **endpoint:** `/v2/players/list`
    pub async fn fetch_player_list(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["v2", "players", "list"], &[]);
        self.make_request(url).await
    }

    /// Details of a connected player: group, position, inventory,
    /// buffs.
    ///
    /// **endpoint:** `/players/read`
    pub async fn fetch_player_info(&self, player: &str) -> Result<Value, RestError> {
        let url = self
            .urls
            .url(&["players", "read"], &[("player", player.to_string())]);
        self.make_request(url).await
    }

    /// Like [`fetch_player_info`](TShock::fetch_player_info) but with
    /// the richer v4 payload (mute state, piggy bank, safe, forge).
    ///
    /// **endpoint:** `/v4/players/read`
    pub async fn fetch_player_info_v4(&self, player: &str) -> Result<Value, RestError> {
        let url = self
            .urls
            .url(&["v4", "players", "read"], &[("player", player.to_string())]);
        self.make_request(url).await
    }

    /// Kicks a connected player.
    ///
    /// **endpoint:** `/v2/players/kick`
    pub async fn do_kick_player(&self, player: &str, reason: &str) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "players", "kick"],
            &[
                ("reason", reason.to_string()),
                ("player", player.to_string()),
            ],
        );
        self.make_request(url).await
    }

    /// Bans a connected player permanently.
    ///
    /// **endpoint:** `/v2/players/ban`
    pub async fn do_ban_player(&self, player: &str, reason: &str) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "players", "ban"],
            &[
                ("reason", reason.to_string()),
                ("player", player.to_string()),
            ],
        );
        self.make_request(url).await
    }

    /// Kills a player. `killer` is shown to the victim as the name in
    /// the "just killed you" message.
    ///
    /// **endpoint:** `/v2/players/kill`
    pub async fn do_kill_player(&self, player: &str, killer: &str) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "players", "kill"],
            &[
                ("player", player.to_string()),
                ("from", killer.to_string()),
            ],
        );
        self.make_request(url).await
    }

    /// **endpoint:** `/v2/players/mute`
    pub async fn do_mute_player(&self, player: &str) -> Result<Value, RestError> {
        let url = self
            .urls
            .url(&["v2", "players", "mute"], &[("player", player.to_string())]);
        self.make_request(url).await
    }

    /// **endpoint:** `/v2/players/unmute`
    pub async fn do_unmute_player(&self, player: &str) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "players", "unmute"],
            &[("player", player.to_string())],
        );
        self.make_request(url).await
    }

    // ========================================================================
    // Bans
    // ========================================================================

    /// All bans currently on the server.
    ///
    /// **endpoint:** `/v2/bans/list`
    pub async fn fetch_ban_list(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["v2", "bans", "list"], &[]);
        self.make_request(url).await
    }

    /// Details of a single ban, looked up by name or IP.
    ///
    /// **endpoint:** `/v2/bans/read`
    pub async fn fetch_ban_information(
        &self,
        lookup: BanLookupType,
        ban: &str,
    ) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "bans", "read"],
            &[
                ("type", lookup.as_str().to_string()),
                ("ban", ban.to_string()),
            ],
        );
        self.make_request(url).await
    }

    /// Bans by IP address. `name` and `reason` may be empty strings.
    ///
    /// **endpoint:** `/bans/create`
    pub async fn do_create_ban(
        &self,
        ip: &str,
        name: &str,
        reason: &str,
    ) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["bans", "create"],
            &[
                ("ip", ip.to_string()),
                ("name", name.to_string()),
                ("reason", reason.to_string()),
            ],
        );
        self.make_request(url).await
    }

    /// Lifts a ban.
    ///
    /// **endpoint:** `/v2/bans/destroy`
    pub async fn do_delete_ban(
        &self,
        lookup: BanLookupType,
        ban: &str,
    ) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "bans", "destroy"],
            &[
                ("ban", ban.to_string()),
                ("type", lookup.as_str().to_string()),
            ],
        );
        self.make_request(url).await
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// All groups configured on the server.
    ///
    /// **endpoint:** `/v2/groups/list`
    pub async fn fetch_group_list(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["v2", "groups", "list"], &[]);
        self.make_request(url).await
    }

    /// A single group with its direct, negated, and inherited
    /// permissions.
    ///
    /// **endpoint:** `/v2/groups/read`
    pub async fn fetch_group_info(&self, group: &str) -> Result<Value, RestError> {
        let url = self
            .urls
            .url(&["v2", "groups", "read"], &[("group", group.to_string())]);
        self.make_request(url).await
    }

    /// Creates a group. `permissions` is a CSV permission list and
    /// `chatcolor` three CSV RGB byte values.
    ///
    /// **endpoint:** `/v2/groups/create`
    pub async fn do_group_create(
        &self,
        group: &str,
        parent: &str,
        permissions: &str,
        chatcolor: &str,
    ) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "groups", "create"],
            &[
                ("group", group.to_string()),
                ("parent", parent.to_string()),
                ("permissions", permissions.to_string()),
                ("chatcolor", chatcolor.to_string()),
            ],
        );
        self.make_request(url).await
    }

    /// Updates a group. `None` fields are sent as empty strings, which
    /// the endpoint treats as "leave unchanged".
    ///
    /// **endpoint:** `/v2/groups/update`
    pub async fn set_group_update(
        &self,
        group: &str,
        parent: Option<&str>,
        chatcolor: Option<&str>,
        permissions: Option<&str>,
    ) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "groups", "update"],
            &[
                ("group", group.to_string()),
                ("parent", parent.unwrap_or_default().to_string()),
                ("chatcolor", chatcolor.unwrap_or_default().to_string()),
                ("permissions", permissions.unwrap_or_default().to_string()),
            ],
        );
        self.make_request(url).await
    }

    /// Deletes a group.
    ///
    /// **endpoint:** `/v2/groups/destroy`
    pub async fn do_group_delete(&self, group: &str) -> Result<Value, RestError> {
        let url = self
            .urls
            .url(&["v2", "groups", "destroy"], &[("group", group.to_string())]);
        self.make_request(url).await
    }

    // ========================================================================
    // World
    // ========================================================================

    /// Name, size, time, and event state of the running world.
    ///
    /// **endpoint:** `/world/read`
    pub async fn fetch_world_info(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["world", "read"], &[]);
        self.make_request(url).await
    }

    /// Drops a meteor on the world.
    ///
    /// **endpoint:** `/world/meteor`
    pub async fn do_world_meteor(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["world", "meteor"], &[]);
        self.make_request(url).await
    }

    /// Saves the world.
    ///
    /// **endpoint:** `/v2/world/save`
    pub async fn do_world_save(&self) -> Result<Value, RestError> {
        let url = self.urls.url(&["v2", "world", "save"], &[]);
        self.make_request(url).await
    }

    /// Butchers hostile NPCs; `killfriendly` extends that to friendly
    /// mobs. Town NPCs are never killed.
    ///
    /// **endpoint:** `/v2/world/butcher`
    pub async fn do_world_butcher(&self, killfriendly: bool) -> Result<Value, RestError> {
        let url = self.urls.url(
            &["v2", "world", "butcher"],
            &[("killfriendly", killfriendly.to_string())],
        );
        self.make_request(url).await
    }

    /// Starts or stops a blood moon.
    ///
    /// **endpoint:** `/world/bloodmoon/{bool}`
    pub async fn set_world_bloodmoon(&self, bloodmoon: bool) -> Result<Value, RestError> {
        let flag = if bloodmoon { "true" } else { "false" };
        let url = self.urls.url(&["world", "bloodmoon", flag], &[]);
        self.make_request(url).await
    }

    /// Turns world autosaving on or off.
    ///
    /// **endpoint:** `/v2/world/autosave/state/{bool}`
    pub async fn set_world_autosaving(&self, autosave: bool) -> Result<Value, RestError> {
        let flag = if autosave { "true" } else { "false" };
        let url = self
            .urls
            .url(&["v2", "world", "autosave", "state", flag], &[]);
        self.make_request(url).await
    }
}

/// Pulls the most useful error text out of a non-2xx body: TShock
/// reports failures in an `error` member, some endpoints use
/// `response`, and anything else falls back to the raw body.
fn api_message(body: &str) -> String {
    if let Ok(data) = serde_json::from_str::<Value>(body) {
        for key in ["error", "response"] {
            if let Some(message) = data.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error detail provided".to_string()
    } else {
        trimmed.to_string()
    }
}
