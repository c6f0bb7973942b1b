//! Session value and the shared single-cell store that distributes it.

// self
use crate::{
	_prelude::*,
	auth::{Credential, Identity},
};

/// Client-side session state: identity + credential plus status flags.
///
/// Constructed only through the provided constructors so an identity can
/// never outlive its credential: "authenticated" always means both halves
/// are present together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
	identity: Option<Identity>,
	credential: Option<Credential>,
	loading: bool,
	error: Option<String>,
}
impl Session {
	/// Empty session: no identity, no credential, idle.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Empty session with the loading flag raised while a call is in flight.
	pub fn loading() -> Self {
		Self { loading: true, ..Self::default() }
	}

	/// Authenticated session holding both halves of the pair.
	pub fn authenticated(identity: Identity, credential: Credential) -> Self {
		Self { identity: Some(identity), credential: Some(credential), loading: false, error: None }
	}

	/// Empty session carrying the inline error message from a failed login.
	pub fn failed(message: impl Into<String>) -> Self {
		Self { error: Some(message.into()), ..Self::default() }
	}

	/// Identity of the authenticated caller, when present.
	pub fn identity(&self) -> Option<&Identity> {
		self.identity.as_ref()
	}

	/// Bearer credential proving the session is active, when present.
	pub fn credential(&self) -> Option<&Credential> {
		self.credential.as_ref()
	}

	/// `true` while a gateway call is outstanding.
	pub fn is_loading(&self) -> bool {
		self.loading
	}

	/// Inline error message from the most recent failed login, if any.
	pub fn last_error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// `true` iff both identity and credential are present.
	pub fn is_authenticated(&self) -> bool {
		self.identity.is_some() && self.credential.is_some()
	}
}

/// Shared callback invoked with each newly published session snapshot.
pub type Subscriber = Arc<dyn Fn(&Session) + Send + Sync>;

/// Handle identifying a registered subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct SubscriberSet {
	next_id: u64,
	entries: Vec<(SubscriptionId, Subscriber)>,
}

#[derive(Default)]
struct StoreShared {
	cell: RwLock<Session>,
	subscribers: Mutex<SubscriberSet>,
}

/// Shared single-cell session store with explicit subscriber distribution.
///
/// The store is the only holder of the current [`Session`]; the gateway and
/// the startup restore routine are its only writers, and every write is a
/// whole-value replacement so readers never observe a partial pair. Clone
/// handles share the same cell; inject the store into collaborators instead
/// of reaching for a global.
#[derive(Clone, Default)]
pub struct SessionStore(Arc<StoreShared>);
impl SessionStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a snapshot of the current session.
	pub fn snapshot(&self) -> Session {
		self.0.cell.read().clone()
	}

	/// Replaces the session wholesale and notifies subscribers.
	pub fn set(&self, session: Session) {
		*self.0.cell.write() = session.clone();

		self.notify(&session);
	}

	/// Empties the session (idle, no error) and notifies subscribers.
	pub fn clear(&self) {
		self.set(Session::empty());
	}

	/// Registers a subscriber invoked after every replacement.
	pub fn subscribe(&self, subscriber: impl Fn(&Session) + Send + Sync + 'static) -> SubscriptionId {
		let mut set = self.0.subscribers.lock();
		let id = SubscriptionId(set.next_id);

		set.next_id += 1;
		set.entries.push((id, Arc::new(subscriber)));

		id
	}

	/// Removes a subscriber; returns `false` when the id is unknown.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut set = self.0.subscribers.lock();
		let before = set.entries.len();

		set.entries.retain(|(entry_id, _)| *entry_id != id);

		set.entries.len() != before
	}

	fn notify(&self, session: &Session) {
		// snapshot the list so a callback may subscribe, unsubscribe, or write
		// the store without deadlocking on the subscriber lock
		let subscribers: Vec<Subscriber> = self
			.0
			.subscribers
			.lock()
			.entries
			.iter()
			.map(|(_, subscriber)| subscriber.clone())
			.collect();

		for subscriber in subscribers {
			subscriber(session);
		}
	}
}
impl Debug for SessionStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionStore").field("session", &self.snapshot()).finish()
	}
}
