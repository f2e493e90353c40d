//! Paged person listing used by the CLI demo and the tests.
use crate::impl_composite;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageInfo {
    pub total_number: i32,
    pub total_page: i32,
    pub page_size: i32,
    pub current_page: i32,
}

impl_composite!(PageInfo {
    "totalNumber" => total_number,
    "totalPage" => total_page,
    "pageSize" => page_size,
    "currentPage" => current_page,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i32,
    pub hobbies: Vec<String>,
}

impl_composite!(Person {
    "name" => name,
    "age" => age,
    "hobbies" => hobbies,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagedPersons {
    pub page: PageInfo,
    pub persons: Vec<Person>,
}

impl_composite!(PagedPersons {
    "page" => page,
    "persons" => persons,
});

fn person(name: &str, age: i32, hobbies: &[&str]) -> Person {
    Person {
        name: name.to_owned(),
        age,
        hobbies: hobbies.iter().map(|h| h.to_string()).collect(),
    }
}

/// 80 people over 4 pages of 20, first page holding three of them.
pub fn sample_paged_persons() -> PagedPersons {
    PagedPersons {
        page: PageInfo {
            total_number: 80,
            total_page: 4,
            page_size: 80 / 4,
            current_page: 1,
        },
        persons: vec![
            person("A", 18, &["running", "TV"]),
            person("B", 16, &["reading", "swimming"]),
            person("C", 21, &["gaming", "swimming"]),
        ],
    }
}
