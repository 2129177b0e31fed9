/// One notification as delivered to an observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<T> {
    pub value: T,
    pub old_value: Option<T>,
}

impl<T> Change<T> {
    pub fn new(value: T, old_value: Option<T>) -> Self {
        Self { value, old_value }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> From<T> for Change<T> {
    fn from(value: T) -> Self {
        Change::new(value, None)
    }
}
