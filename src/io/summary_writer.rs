use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::IoError;
use crate::storage::StatisticsSnapshot;

/// Write a statistics summary in the periodic report layout
pub async fn write_summary<W>(snapshot: &StatisticsSnapshot, mut writer: W) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + Send,
{
    writer
        .write_all(format!("Total Tweets Received: {}\n", snapshot.total).as_bytes())
        .await?;
    writer
        .write_all(format!("Top {} HashTags\n", snapshot.limit).as_bytes())
        .await?;

    for entry in &snapshot.top_tags {
        writer
            .write_all(format!("{}: {}\n", entry.tag, entry.count).as_bytes())
            .await?;
    }

    writer.flush().await?;
    Ok(())
}
