pub(crate) mod attendance;
pub(crate) mod classes;
pub(crate) mod grade_records;
pub(crate) mod health;
pub(crate) mod students;
pub(crate) mod subjects;
