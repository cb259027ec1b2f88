use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct List<T> {
    data: Vec<T>,
}

impl<T> List<T> {
    pub fn new(data: Vec<T>) -> Self {
        List { data }
    }
}

#[derive(Debug, Serialize)]
pub struct Single<T> {
    data: T,
}

impl<T> Single<T> {
    pub fn new(data: T) -> Self {
        Single { data }
    }
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub application_id: i32,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub ok: bool,
    pub db: &'static str,
}
