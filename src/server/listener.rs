use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tracing::{Instrument, error, info, info_span, warn};

use crate::config::Config;
use crate::http::connection::{Connection, Timeouts};
use crate::http::resolver::Resolver;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(cfg.listen_addr()).await?;
    info!("Listening on {}, serving {}", cfg.listen_addr(), cfg.root.display());

    serve(listener, cfg).await
}

/// Accepts connections forever, one task per connection.
///
/// A failed accept or a failed connection never stops the loop.
pub async fn serve(listener: TcpListener, cfg: &Config) -> anyhow::Result<()> {
    let resolver = Arc::new(Resolver::new(&cfg.root, cfg.index.clone()));
    let timeouts = Timeouts {
        read: cfg.read_timeout,
        write: cfg.write_timeout,
    };
    let mut next_id: u64 = 0;

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(cause = %e, "Failed to accept");
                continue;
            }
        };

        let id = next_id;
        next_id = next_id.wrapping_add(1);
        info!(id, "Accepted connection from {}", peer);

        let span = info_span!("connection", id, %peer);
        spawn_connection(socket, Arc::clone(&resolver), timeouts, span);
    }
}

fn spawn_connection<S>(stream: S, resolver: Arc<Resolver>, timeouts: Timeouts, span: tracing::Span)
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    tokio::spawn(
        async move {
            let conn = Connection::new(stream, resolver).with_timeouts(timeouts);
            if let Err(e) = conn.run().await {
                error!("Connection error: {:#}", e);
            }
        }
        .instrument(span),
    );
}
