//! [`Notification`]-related read definitions.

use crate::domain::Notification;

/// [`Notification`]s of the owner's inbox, newest first.
#[derive(Clone, Debug, Default)]
pub struct Inbox {
    /// [`Notification`]s passing the [`list::Filter`].
    pub notifications: Vec<Notification>,

    /// Number of unread [`Notification`]s in the whole inbox, regardless of
    /// the [`list::Filter`].
    pub unread: usize,
}

pub mod list {
    //! [`Notification`] list definitions.

    use crate::domain::Notification;

    /// Filter of a [`Notification`] list.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// Indicator whether only unread [`Notification`]s are listed.
        pub unread_only: bool,
    }

    impl Filter {
        /// Checks whether the provided [`Notification`] passes this
        /// [`Filter`].
        #[must_use]
        pub fn matches(&self, notification: &Notification) -> bool {
            !(self.unread_only && notification.is_read())
        }
    }
}
