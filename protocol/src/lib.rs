pub mod request;
pub mod response;
pub mod question;
pub mod wall;

pub use response::*;
pub use request::*;
pub use question::*;
pub use wall::*;

use serde::{Serialize, Deserialize};
use bincode::{serialize, deserialize, ErrorKind};
use tokio_tungstenite::tungstenite::Message;

/// Panel frames travel as bincode binary messages.
pub trait BinCodeMessage<'a>: Serialize + Deserialize<'a>{
    fn deser(bin: &'a [u8]) -> Result<Self, Box<ErrorKind>> {
        deserialize::<Self>(&bin)
    }

    fn ser(&self) -> Result<Message, Box<ErrorKind>> {
        let bin = serialize(&self)?;
        Ok(Message::Binary(bin))
    }
}

/// Wall frames travel as json text, the same `{action, data}` shape the
/// display page already understands.
pub trait JsonMessage: Serialize {
    fn to_text(&self) -> Result<Message, serde_json::Error> {
        let text = serde_json::to_string(&self)?;
        Ok(Message::Text(text))
    }
}
