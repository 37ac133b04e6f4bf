//! Client for the line-based position source (old-style gpsd `O` report).

use std::net::SocketAddr;
use std::time::Duration;

use homeward_proto::{GeoPoint, PositionReport, PositionSample};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{lookup_host, TcpSocket, TcpStream};
use tracing::{debug, info};

use crate::error::FatalError;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 2947;

const POLL_COMMAND: &[u8] = b"o\r\n";
const REPLY_HEADER: &str = "GPSD,";
const NO_FIX: &str = "?";

pub struct GpsdClient {
    stream: BufReader<TcpStream>,
    peer: SocketAddr,
    read_timeout: Option<Duration>,
    line: String,
}

impl GpsdClient {
    /// Tries every resolved address in turn; the last failure is returned.
    pub async fn connect(host: &str, port: u16, read_timeout: Option<Duration>) -> Result<Self, FatalError> {
        let addrs: Vec<SocketAddr> = lookup_host((host, port))
            .await
            .map_err(|source| FatalError::HostUnresolvable { host: host.to_string(), source })?
            .collect();
        if addrs.is_empty() {
            return Err(FatalError::HostUnresolvable {
                host: host.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses"),
            });
        }

        let mut last_err = None;
        for addr in addrs {
            let socket = if addr.is_ipv4() { TcpSocket::new_v4() } else { TcpSocket::new_v6() };
            let socket = match socket {
                Ok(s) => s,
                Err(e) => { last_err = Some(FatalError::SocketCreate(e)); continue; }
            };
            match socket.connect(addr).await {
                Ok(stream) => {
                    info!("gpsd: connected to {}", addr);
                    return Ok(Self { stream: BufReader::new(stream), peer: addr, read_timeout, line: String::new() });
                }
                Err(source) => {
                    debug!("gpsd: connect {} failed: {}", addr, source);
                    last_err = Some(FatalError::Connect { addr: addr.to_string(), source });
                }
            }
        }
        Err(last_err.unwrap_or_else(|| FatalError::Protocol("no address tried".into())))
    }

    /// One request/reply exchange.
    pub async fn poll(&mut self) -> Result<PositionReport, FatalError> {
        let w = self.stream.get_mut();
        w.write_all(POLL_COMMAND).await.map_err(FatalError::Io)?;
        w.flush().await.map_err(FatalError::Io)?;

        self.line.clear();
        let n = match self.read_timeout {
            Some(t) => tokio::time::timeout(t, self.stream.read_line(&mut self.line))
                .await
                .map_err(|_| FatalError::ReadTimeout(t))?,
            None => self.stream.read_line(&mut self.line).await,
        }
        .map_err(FatalError::Io)?;
        if n == 0 {
            return Err(FatalError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "position source closed the connection",
            )));
        }

        debug!("gpsd: <- {}", self.line.trim_end());
        parse_reply(&self.line)
    }

    pub async fn close(mut self) -> Result<(), FatalError> {
        self.stream.get_mut().shutdown().await.map_err(FatalError::SocketClose)?;
        info!("gpsd: closed connection to {}", self.peer);
        Ok(())
    }
}

/// `GPSD,O=<tag> <time> <ept> <lat> <lon> <alt> <eph> <epv> <track> ...`
///
/// `GPSD,O=?`, or `?` for time or position, is "no fix". `?` for the track is
/// an unknown course.
pub fn parse_reply(line: &str) -> Result<PositionReport, FatalError> {
    let line = line.trim();
    let bad = |why: &str| FatalError::Protocol(format!("{} in '{}'", why, line));

    let body = line.strip_prefix(REPLY_HEADER).ok_or_else(|| bad("missing GPSD header"))?;
    let report = body
        .split(',')
        .find_map(|f| f.strip_prefix("O="))
        .ok_or_else(|| bad("missing O= report"))?;
    if report == NO_FIX {
        return Ok(PositionReport::NoFix);
    }

    let fields: Vec<&str> = report.split_whitespace().collect();
    if fields.len() < 9 {
        return Err(bad("short O= report"));
    }
    let (ts, lat, lon, track) = (fields[1], fields[3], fields[4], fields[8]);
    if [ts, lat, lon].contains(&NO_FIX) {
        return Ok(PositionReport::NoFix);
    }

    let num = |s: &str, what: &str| s.parse::<f64>().map_err(|_| bad(&format!("bad {}", what)));
    let ts_epoch_s = num(ts, "time")?.trunc() as i64;
    let point = GeoPoint::new(num(lat, "latitude")?, num(lon, "longitude")?);
    let course_deg = if track == NO_FIX { None } else { Some(num(track, "track")?) };

    Ok(PositionReport::Fix(PositionSample { ts_epoch_s, point, course_deg }))
}
