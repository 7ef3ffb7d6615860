//! Student directory
//!
//! Full identity records keyed by student id. The participant roster reads
//! from here and copies out only its allow-listed fields.

use std::collections::HashMap;

use crate::models::Student;

#[derive(Debug, Clone, Default)]
pub struct StudentDirectory {
    students: Vec<Student>,
    index: HashMap<String, usize>,
}

impl StudentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_students(students: Vec<Student>) -> Self {
        let mut directory = Self::new();
        for student in students {
            directory.upsert(student);
        }
        directory
    }

    /// Insert or replace a student record
    pub fn upsert(&mut self, student: Student) {
        match self.index.get(&student.id) {
            Some(&i) => self.students[i] = student,
            None => {
                self.index.insert(student.id.clone(), self.students.len());
                self.students.push(student);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Student> {
        self.index.get(id).and_then(|&i| self.students.get(i))
    }

    pub fn list(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, name: &str) -> Student {
        Student {
            id: id.to_string(),
            name: name.to_string(),
            roll_number: "21CS001".to_string(),
            branch: "CSE".to_string(),
            year: "2".to_string(),
            email: "s@campus.edu".to_string(),
            phone: None,
            is_admin: false,
        }
    }

    #[test]
    fn test_upsert_replaces_existing_record() {
        let mut directory = StudentDirectory::new();
        directory.upsert(student("s1", "Old Name"));
        directory.upsert(student("s2", "Other"));
        directory.upsert(student("s1", "New Name"));

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.get("s1").map(|s| s.name.as_str()), Some("New Name"));
        assert_eq!(directory.list()[0].id, "s1");
    }
}
