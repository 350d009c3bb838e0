//! TiVo remote protocol client
//!
//! # Connection Lifecycle
//!
//! Every operation is a short-lived session:
//! 1. **Connect**: open a TCP connection and read the unsolicited status line
//!    the device usually sends on connect (e.g. `CH_STATUS 0702 LOCAL`)
//! 2. **Exchange**: write one `<VERB> <ARG>\r` line and read one response line
//! 3. **Close**: release the socket, on success and on every error path
//!
//! A response read that times out is not an error: many commands produce no
//! reply, so the response is treated as empty and no state changes.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use tivo_client::{Remote, RemoteConfig};
//!
//! # async fn run() -> tivo_core::TivoResult<()> {
//! let mut remote = Remote::new(RemoteConfig::new("192.168.0.10")?);
//! remote.send_ircode("CHANNELUP").await?;
//! remote.teleport("GUIDE").await?;
//! println!("{:?} on {}", remote.channel().await?, remote.screen());
//! # Ok(())
//! # }
//! ```

use crate::config::RemoteConfig;
use tivo_core::{Command, Response, Screen, TivoError, TivoResult};
use tivo_transport::{StreamAccessor, TcpTransport, TransportLayer};

/// TiVo remote protocol handler
///
/// Holds the configuration and the channel and screen state inferred from
/// device responses. Operations take `&mut self`, so one instance runs one
/// exchange at a time; control several devices with several instances.
#[derive(Debug)]
pub struct Remote {
    config: RemoteConfig,
    connection: Option<TcpTransport>,
    /// Status line read right after the most recent connect
    status: String,
    channel: Option<String>,
    screen: Screen,
}

impl Remote {
    /// Create a remote; no connection is opened until an operation needs one
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            connection: None,
            status: String::new(),
            channel: None,
            screen: Screen::LiveTv,
        }
    }

    /// Create a remote for `host` with the default port and timeout
    pub fn with_host(host: impl Into<String>) -> TivoResult<Self> {
        Ok(Self::new(RemoteConfig::new(host)?))
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Open a connection to the configured device and store its status line
    ///
    /// Any previous connection is closed first. A timeout while waiting for
    /// the status line leaves the status empty; the connection stays usable.
    ///
    /// # Errors
    /// - `ConnectTimeout` if the TCP connect does not finish in time
    /// - `ConnectionRefused`, `HostUnreachable` or `Connection` for I/O failures
    pub async fn connect(&mut self) -> TivoResult<&mut TcpTransport> {
        self.close().await;

        let mut transport = TcpTransport::new(self.config.tcp_settings());
        transport.open().await?;

        let status = match read_response(&mut transport).await {
            Ok(status) => status,
            Err(e) => {
                transport.close().await;
                return Err(e);
            }
        };
        log::debug!("Status: {:?}", status);
        self.status = status;

        Ok(self.connection.insert(transport))
    }

    /// Close any existing connection. Safe to call repeatedly.
    pub async fn close(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close().await;
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Status line observed on the most recent connect; empty if none arrived
    pub fn last_status(&self) -> &str {
        &self.status
    }

    /// Send an infrared remote code, e.g. `CHANNELUP`
    pub async fn send_ircode(&mut self, code: &str) -> TivoResult<()> {
        self.send_command(Command::ircode(code)?).await.map(|_| ())
    }

    /// Send a keyboard code
    pub async fn send_keyboard(&mut self, key: &str) -> TivoResult<()> {
        self.send_command(Command::keyboard(key)?).await.map(|_| ())
    }

    /// Tune to `channel`
    pub async fn set_channel(&mut self, channel: &str) -> TivoResult<()> {
        self.send_command(Command::set_channel(channel)?).await.map(|_| ())
    }

    /// Navigate to one of the fixed screens
    ///
    /// `TIVO` is the main menu, `LIVETV` live viewing, `GUIDE` the program
    /// guide and `NOWPLAYING` the list of recordings. A `LIVETV_READY` reply
    /// always means live TV. Otherwise the requested screen is assumed, and an
    /// unrecognised name falls back to live TV.
    pub async fn teleport(&mut self, screen: &str) -> TivoResult<()> {
        let response = self.send_command(Command::teleport(screen)?).await?;

        self.screen = match response {
            Response::LiveTvReady => Screen::LiveTv,
            _ => Screen::from_name(screen).unwrap_or(Screen::LiveTv),
        };
        log::debug!("Screen: {}", self.screen);
        Ok(())
    }

    /// Navigate to `screen`
    pub async fn teleport_to(&mut self, screen: Screen) -> TivoResult<()> {
        self.teleport(screen.as_str()).await
    }

    /// Query the current channel
    ///
    /// Reconnects to observe the status line the device sends on connect. If
    /// that line carries no channel the last known channel is returned.
    pub async fn channel(&mut self) -> TivoResult<Option<String>> {
        self.connect().await?;
        self.close().await;

        let status = Response::parse(&self.status);
        self.update_channel(&status);
        Ok(self.channel.clone())
    }

    /// Last known channel, without any network traffic
    pub fn cached_channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Last known screen
    ///
    /// The protocol cannot query the current screen, so this is only what
    /// the last teleport implies and diverges if the physical remote is used.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    async fn send_command(&mut self, command: Command) -> TivoResult<Response> {
        let result = self.exchange(&command).await;
        self.close().await;

        let line = result?;
        log::debug!("{} -> {:?}", command, line);

        let response = Response::parse(&line);
        self.update_channel(&response);
        Ok(response)
    }

    async fn exchange(&mut self, command: &Command) -> TivoResult<String> {
        let connection = self.connect().await?;
        connection.write_all(&command.encode()).await?;
        connection.flush().await?;
        read_response(connection).await
    }

    fn update_channel(&mut self, response: &Response) {
        if let Some(channel) = response.channel() {
            log::debug!("Channel: {}", channel);
            self.channel = Some(channel.to_string());
        }
    }
}

/// Read one response line; a timeout means no response
async fn read_response<S: StreamAccessor + ?Sized>(stream: &mut S) -> TivoResult<String> {
    match stream.read_line().await {
        Err(TivoError::Timeout) => Ok(String::new()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpSocket, TcpStream};
    use tokio::task::JoinHandle;

    /// What the stub device does on one accepted connection
    #[derive(Clone, Copy)]
    struct Session {
        greeting: Option<&'static str>,
        reply: Option<&'static str>,
    }

    const SILENT: Session = Session { greeting: None, reply: None };

    fn reply(reply: &'static str) -> Session {
        Session { greeting: None, reply: Some(reply) }
    }

    fn greeting(greeting: &'static str) -> Session {
        Session { greeting: Some(greeting), reply: None }
    }

    /// Serve `sessions` in order; yields the command line received on each
    async fn stub_device(sessions: Vec<Session>) -> (u16, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            let mut received = Vec::new();
            for session in sessions {
                let (mut socket, _) = listener.accept().await.unwrap();
                if let Some(greeting) = session.greeting {
                    socket.write_all(format!("{}\r\n", greeting).as_bytes()).await.unwrap();
                }

                let mut line = Vec::new();
                let mut byte = [0u8; 1];
                while socket.read(&mut byte).await.unwrap_or(0) == 1 && byte[0] != b'\r' {
                    line.push(byte[0]);
                }
                received.push(String::from_utf8(line).unwrap());

                if let Some(reply) = session.reply {
                    socket.write_all(format!("{}\r\n", reply).as_bytes()).await.unwrap();
                }
                let mut rest = Vec::new();
                let _ = socket.read_to_end(&mut rest).await;
            }
            received
        });

        (port, handle)
    }

    fn remote(port: u16) -> Remote {
        let config = RemoteConfig::builder()
            .host("127.0.0.1")
            .port(port)
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        Remote::new(config)
    }

    #[test]
    fn test_new_remote_state() {
        let remote = Remote::with_host("203.0.113.5").unwrap();
        assert_eq!(remote.config().port(), 31339);
        assert_eq!(remote.config().timeout(), Some(Duration::from_millis(250)));
        assert_eq!(remote.screen(), Screen::LiveTv);
        assert_eq!(remote.cached_channel(), None);
        assert!(!remote.is_connected());
        assert!(matches!(Remote::with_host(""), Err(TivoError::MissingHost)));
    }

    #[tokio::test]
    async fn test_ircode_updates_channel() {
        let (port, device) = stub_device(vec![reply("CH_STATUS 5"), SILENT]).await;
        let mut remote = remote(port);

        remote.send_ircode("CHANNELUP").await.unwrap();
        assert!(!remote.is_connected());
        assert_eq!(remote.channel().await.unwrap(), Some("5".to_string()));

        assert_eq!(device.await.unwrap(), vec!["IRCODE CHANNELUP", ""]);
    }

    #[tokio::test]
    async fn test_commands_on_the_wire() {
        let (port, device) = stub_device(vec![
            reply("CH_STATUS 0702 LOCAL"),
            reply("CH_FAILED NO_LIVE"),
            SILENT,
        ])
        .await;
        let mut remote = remote(port);

        remote.set_channel("702").await.unwrap();
        assert_eq!(remote.cached_channel(), Some("0702"));
        remote.send_keyboard("A").await.unwrap();
        assert_eq!(remote.cached_channel(), Some("0702"));
        remote.send_ircode("NUM1").await.unwrap();
        assert_eq!(remote.cached_channel(), Some("0702"));

        assert_eq!(
            device.await.unwrap(),
            vec!["SETCH 702", "KEYBOARD A", "IRCODE NUM1"]
        );
    }

    #[tokio::test]
    async fn test_response_timeout_is_not_an_error() {
        let (port, device) = stub_device(vec![
            reply("CH_STATUS 42"),
            SILENT,
            Session { greeting: Some("CH_STATUS 99"), reply: None },
        ])
        .await;
        let mut remote = remote(port);

        remote.send_ircode("INFO").await.unwrap();
        remote.send_ircode("GUIDE").await.unwrap();
        assert_eq!(remote.cached_channel(), Some("42"));
        assert_eq!(remote.screen(), Screen::LiveTv);

        // Commands only take the channel from their own reply
        remote.send_ircode("SELECT").await.unwrap();
        assert_eq!(remote.last_status(), "CH_STATUS 99");
        assert_eq!(remote.cached_channel(), Some("42"));
        assert!(!remote.is_connected());

        device.await.unwrap();
    }

    #[tokio::test]
    async fn test_teleport_to_each_screen() {
        let (port, device) = stub_device(vec![reply("OK"), SILENT, reply("OK"), SILENT]).await;
        let mut remote = remote(port);

        for screen in [Screen::Tivo, Screen::Guide, Screen::NowPlaying, Screen::LiveTv] {
            remote.teleport_to(screen).await.unwrap();
            assert_eq!(remote.screen(), screen);
        }

        assert_eq!(
            device.await.unwrap(),
            vec!["TELEPORT TIVO", "TELEPORT GUIDE", "TELEPORT NOWPLAYING", "TELEPORT LIVETV"]
        );
    }

    #[tokio::test]
    async fn test_teleport_livetv_ready_wins() {
        let (port, device) = stub_device(vec![reply("OK"), reply("LIVETV_READY")]).await;
        let mut remote = remote(port);

        remote.teleport("GUIDE").await.unwrap();
        assert_eq!(remote.screen(), Screen::Guide);
        remote.teleport("NOWPLAYING").await.unwrap();
        assert_eq!(remote.screen(), Screen::LiveTv);

        device.await.unwrap();
    }

    #[tokio::test]
    async fn test_teleport_unknown_screen_resets() {
        let (port, device) = stub_device(vec![reply("OK"), SILENT]).await;
        let mut remote = remote(port);

        remote.teleport("TIVO").await.unwrap();
        assert_eq!(remote.screen(), Screen::Tivo);
        remote.teleport("NETFLIX").await.unwrap();
        assert_eq!(remote.screen(), Screen::LiveTv);

        device.await.unwrap();
    }

    #[tokio::test]
    async fn test_channel_query_keeps_previous_channel() {
        let (port, device) = stub_device(vec![
            greeting("CH_STATUS 0101 LOCAL"),
            SILENT,
            greeting("MISC_STATUS"),
        ])
        .await;
        let mut remote = remote(port);

        assert_eq!(remote.channel().await.unwrap(), Some("0101".to_string()));
        assert_eq!(remote.channel().await.unwrap(), Some("0101".to_string()));
        assert_eq!(remote.last_status(), "");
        assert_eq!(remote.channel().await.unwrap(), Some("0101".to_string()));
        assert_eq!(remote.last_status(), "MISC_STATUS");

        device.await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_argument_does_not_connect() {
        let mut remote = Remote::with_host("127.0.0.1").unwrap();
        assert!(matches!(
            remote.send_ircode("UP\rIRCODE DOWN").await,
            Err(TivoError::InvalidArgument(_))
        ));
        assert!(!remote.is_connected());
    }

    #[tokio::test]
    async fn test_connection_refused_is_surfaced() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut remote = remote(port);
        let err = remote.set_channel("5").await.unwrap_err();
        assert!(matches!(err, TivoError::ConnectionRefused(_)), "{:?}", err);
        assert!(!remote.is_connected());
        assert_eq!(remote.cached_channel(), None);
    }

    /// A listener that never accepts, with its accept queue already full so
    /// further connection attempts stall in the handshake
    async fn saturated_listener() -> (TcpListener, u16, Vec<TcpStream>) {
        let socket = TcpSocket::new_v4().unwrap();
        socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let listener = socket.listen(1).unwrap();
        let addr = listener.local_addr().unwrap();

        let mut queued = Vec::new();
        for _ in 0..16 {
            match tokio::time::timeout(Duration::from_millis(100), TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => queued.push(stream),
                _ => break,
            }
        }
        (listener, addr.port(), queued)
    }

    #[tokio::test]
    async fn test_connect_timeout_releases_connection() {
        let (_listener, port, _queued) = saturated_listener().await;
        let mut remote = remote(port);

        let err = remote.send_ircode("CHANNELUP").await.unwrap_err();
        assert!(matches!(err, TivoError::ConnectTimeout), "{:?}", err);
        assert!(!remote.is_connected());
        assert_eq!(remote.cached_channel(), None);

        let err = remote.channel().await.unwrap_err();
        assert!(matches!(err, TivoError::ConnectTimeout), "{:?}", err);
        assert!(!remote.is_connected());
    }

    #[tokio::test]
    async fn test_unterminated_status_does_not_stall() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let device = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let noise = [b'A'; 4096];
            while socket.write_all(&noise).await.is_ok() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        });

        let mut remote = remote(port);
        let channel = tokio::time::timeout(Duration::from_secs(3), remote.channel())
            .await
            .expect("channel query stalled")
            .unwrap();
        assert_eq!(channel, None);
        assert!(remote.last_status().starts_with("AAAA"));
        assert!(!remote.is_connected());

        device.abort();
    }

    #[tokio::test]
    async fn test_close_twice_then_reconnect() {
        let (port, device) = stub_device(vec![greeting("CH_STATUS 7")]).await;
        let mut remote = remote(port);

        remote.close().await;
        remote.close().await;

        let connection = remote.connect().await.unwrap();
        assert!(!connection.is_closed());
        assert_eq!(remote.last_status(), "CH_STATUS 7");
        assert!(remote.is_connected());
        remote.close().await;
        remote.close().await;
        assert!(!remote.is_connected());

        device.await.unwrap();
    }
}
