//! `eventgate run` 핸들러
//!
//! NDJSON 이벤트를 한 줄씩 읽어 게이트를 통과한 이벤트만 stdout에 씁니다.
//! 잘못된 라인(UTF-8이 아니거나, 너무 길거나, JSON이 아닌 라인)은 경고 로그를 남기고 건너뜁니다.

use metrics::counter;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use eventgate_core::EventgateConfig;
use eventgate_core::event::{MAX_EVENT_SIZE, RuntimeEvent};
use eventgate_core::metrics as m;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::gate::{EventGate, Verdict};

/// 스트림 처리 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// 디코딩된 이벤트 수
    pub received: u64,
    /// 출력된 이벤트 수
    pub delivered: u64,
    /// 필터 목록에 의해 버려진 이벤트 수
    pub dropped: u64,
    /// 필드 필터가 적용된 이벤트 수
    pub masked: u64,
    /// 디코딩에 실패한 라인 수
    pub decode_errors: u64,
}

/// `run`을 실행합니다.
///
/// 게이트 컴파일이 실패하면 이벤트를 하나도 읽지 않고 실패합니다.
pub async fn execute(
    args: RunArgs,
    config: &EventgateConfig,
    cancel: CancellationToken,
) -> Result<RunStats, CliError> {
    let gate = EventGate::build(&cancel, config)?;
    let node_name = args.node_name.as_deref();
    let stdout = tokio::io::stdout();

    let stats = match &args.input {
        Some(path) => {
            info!(path = %path.display(), "reading events from file");
            let file = tokio::fs::File::open(path).await?;
            pump(&gate, BufReader::new(file), stdout, node_name, &cancel).await?
        }
        None => {
            info!("reading events from stdin");
            pump(&gate, BufReader::new(tokio::io::stdin()), stdout, node_name, &cancel).await?
        }
    };

    info!(
        received = stats.received,
        delivered = stats.delivered,
        dropped = stats.dropped,
        masked = stats.masked,
        decode_errors = stats.decode_errors,
        "event stream finished"
    );
    Ok(stats)
}

/// 입력에서 이벤트를 읽어 게이트를 거친 결과를 출력에 씁니다.
///
/// 입력이 끝나거나 `cancel`이 취소되면 반환합니다.
pub async fn pump<R, W>(
    gate: &EventGate,
    mut reader: R,
    mut writer: W,
    node_name: Option<&str>,
    cancel: &CancellationToken,
) -> Result<RunStats, CliError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut stats = RunStats::default();
    let mut line_no = 0usize;

    loop {
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(line = line_no, "cancellation requested, stopping event stream");
                break;
            }
            read = read_line_bounded(&mut reader, &mut buf, MAX_EVENT_SIZE) => read?,
        };
        let Some(len) = read else {
            break;
        };
        line_no += 1;

        if len > MAX_EVENT_SIZE {
            let reason = format!("line too large: {len} bytes (max: {MAX_EVENT_SIZE})");
            skip_line(&mut stats, line_no, &reason);
            continue;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                skip_line(&mut stats, line_no, &format!("invalid utf-8: {e}"));
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let mut event = match RuntimeEvent::from_json(line) {
            Ok(event) => event,
            Err(e) => {
                skip_line(&mut stats, line_no, &e.to_string());
                continue;
            }
        };
        stats.received += 1;

        if let Some(node_name) = node_name
            && event.node_name.is_empty()
        {
            event.node_name = node_name.to_owned();
        }

        match gate.process(event) {
            Verdict::Drop => stats.dropped += 1,
            Verdict::Deliver { event, masked } => {
                if masked {
                    stats.masked += 1;
                }
                let mut encoded = serde_json::to_vec(&event)?;
                encoded.push(b'\n');
                writer.write_all(&encoded).await?;
                stats.delivered += 1;
            }
        }
    }

    writer.flush().await?;
    Ok(stats)
}

fn skip_line(stats: &mut RunStats, line_no: usize, reason: &str) {
    stats.decode_errors += 1;
    counter!(m::EVENTS_DECODE_ERRORS_TOTAL).increment(1);
    warn!(line = line_no, error = reason, "skipping malformed event");
}

/// 개행 문자까지 한 줄을 `buf`에 읽습니다.
///
/// `buf`에는 개행을 제외하고 최대 `max + 1`바이트만 보관하며, 나머지는 버립니다.
/// 반환값은 개행을 제외한 라인의 실제 길이이고, 입력이 끝났으면 `None`입니다.
async fn read_line_bounded<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max: usize,
) -> std::io::Result<Option<usize>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let mut len = 0usize;
    let mut seen_any = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(seen_any.then_some(len));
        }
        seen_any = true;

        let (chunk, consumed, done) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (&available[..pos], pos + 1, true),
            None => (available, available.len(), false),
        };
        len += chunk.len();
        let room = (max + 1).saturating_sub(buf.len());
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
        reader.consume(consumed);

        if done {
            return Ok(Some(len));
        }
    }
}
