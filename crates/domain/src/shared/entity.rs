/// Anything persisted with a storage assigned numeric identifier
pub trait Entity {
    fn id(&self) -> i64;
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
