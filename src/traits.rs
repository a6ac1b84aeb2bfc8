use crate::{SimpleVector, VectorError};

/// Implements collect to `SimpleVector`.
pub trait CollectVector: Iterator {
    fn collect_vector(self) -> Result<SimpleVector<Self::Item>, VectorError> where Self::Item: Default;

    fn collect_result_vector<I, E>(self) -> Result<SimpleVector<I>, E>
        where
            Self: Iterator<Item=Result<I, E>>,
            I: Default,
            E: From<VectorError>;
}

impl<Q: Iterator> CollectVector for Q {
    fn collect_vector(self) -> Result<SimpleVector<Self::Item>, VectorError> where Self::Item: Default {
        let (lower, _) = self.size_hint();
        let mut vector = SimpleVector::new();
        vector.reserve(lower)?;
        for item in self {
            vector.push_back(item)?;
        }
        Ok(vector)
    }

    fn collect_result_vector<I, E>(self) -> Result<SimpleVector<I>, E>
        where
            Self: Iterator<Item=Result<I, E>>,
            I: Default,
            E: From<VectorError>
    {
        let (lower, _) = self.size_hint();
        let mut vector = SimpleVector::new();
        vector.reserve(lower)?;
        for mi in self {
            let i = mi?;
            vector.push_back(i)?;
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod traits_tests {
    use crate::{CollectVector, VectorError};

    #[derive(Debug, PartialEq)]
    enum ParseError {
        Vector(VectorError),
        NotANumber(String),
    }

    impl From<VectorError> for ParseError {
        fn from(e: VectorError) -> ParseError {
            ParseError::Vector(e)
        }
    }

    fn parse(s: &str) -> Result<i32, ParseError> {
        s.parse().map_err(|_| ParseError::NotANumber(s.to_string()))
    }

    #[test]
    fn collects_with_exact_capacity_from_size_hint() {
        let v = (0..12).map(|v| v as i16).collect_vector().unwrap();
        assert_eq!(12, v.len());
        assert_eq!(12, v.capacity());
        for (i, (item, expected)) in v.iter().zip((0..12).map(|v| v as i16)).enumerate() {
            assert_eq!(*item, expected, "at index {}", i);
        }
    }

    #[test]
    fn collects_unsized_iterator() {
        let v = (0..50).filter(|v| v % 3 == 0).collect_vector().unwrap();
        assert_eq!(17, v.len());
        assert_eq!(Some(&48), v.iter().last());
    }

    #[test]
    fn collect_result_stops_at_first_error() {
        let ok = ["1", "2", "3"].iter().map(|s| parse(s)).collect_result_vector().unwrap();
        assert_eq!(&[1, 2, 3], ok.as_slice());

        let err = ["1", "x", "3"].iter().map(|s| parse(s)).collect_result_vector();
        assert_eq!(Err(ParseError::NotANumber("x".to_string())), err);
    }
}
