use micro_ws::connection::{WsConfig, WsConnection};
use micro_ws::protocol::{Frame, Opcode, WsError};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = WsConfig::builder().max_payload_size(1024 * 1024).build();

    info!(port = 8080, "start listening");
    let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    loop {
        let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = match WsConnection::accept(reader, writer, &config).await {
                Ok(connection) => connection,
                Err(e) => {
                    warn!(%remote_addr, cause = %e, "websocket handshake failed");
                    return;
                }
            };

            match echo(connection).await {
                Ok(()) => info!(%remote_addr, "finished echo, connection shutdown"),
                Err(e) => error!(%remote_addr, "echo has error, cause {}, connection shutdown", e),
            }
        });
    }
}

/// Sends every data frame back unmasked and answers a close frame with a close frame.
async fn echo(mut connection: WsConnection<OwnedReadHalf, OwnedWriteHalf>) -> Result<(), WsError> {
    while let Some(frame) = connection.next_frame().await {
        let frame = frame?;
        match frame.opcode {
            Opcode::CLOSE => {
                connection.send_frame(Frame::close(frame.payload)).await?;
                return Ok(());
            }
            Opcode::PING => connection.send_frame(Frame::pong(frame.payload)).await?,
            Opcode::PONG => {}
            opcode => {
                let reply = Frame::new(opcode, frame.payload).with_fin(frame.fin);
                connection.send_frame(reply).await?;
            }
        }
    }
    Ok(())
}
