//! Usage flags attached to registered methods.

use std::fmt;

bitflags::bitflags! {
    /// Where and how a registered method may be used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UsageFlags: u32 {
        /// The method is only available when a wallet is loaded.
        const WALLET_ONLY = 1;
        /// The method is only available over a websocket connection.
        const WEBSOCKET_ONLY = 1 << 1;
        /// The method is a notification sent by the server.
        const NOTIFICATION = 1 << 2;
    }
}

impl fmt::Display for UsageFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut separator = "";
        for (name, _) in self.iter_names() {
            write!(f, "{separator}{name}")?;
            separator = "|";
        }
        let unknown = self.bits() & !Self::all().bits();
        if unknown != 0 {
            write!(f, "{separator}{unknown:#x}")?;
        }
        Ok(())
    }
}
