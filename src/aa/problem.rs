use anyhow::{anyhow, Context, Result};
use strum_macros::EnumIter;

/// The semantics associated with a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Semantics {
    /// The complete semantics
    CO,
    /// The preferred semantics
    PR,
    /// The stable semantics
    ST,
    /// The grounded semantics
    GR,
    /// The semi-stable semantics
    SST,
    /// The stage semantics
    STG,
    /// The ideal semantics
    ID,
}

impl Semantics {
    /// Returns a short string representing the semantics.
    ///
    /// The string corresponds to the semantics code as defined in ICCMA competitions.
    pub fn to_short_str(&self) -> &str {
        match self {
            Semantics::CO => "CO",
            Semantics::PR => "PR",
            Semantics::ST => "ST",
            Semantics::GR => "GR",
            Semantics::SST => "SST",
            Semantics::STG => "STG",
            Semantics::ID => "ID",
        }
    }
}

impl TryFrom<&str> for Semantics {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "co" => Ok(Semantics::CO),
            "pr" => Ok(Semantics::PR),
            "st" => Ok(Semantics::ST),
            "gr" => Ok(Semantics::GR),
            "sst" => Ok(Semantics::SST),
            "stg" => Ok(Semantics::STG),
            "id" => Ok(Semantics::ID),
            _ => Err(anyhow!(r#"undefined semantics "{}""#, value)),
        }
    }
}

/// The query to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Query {
    /// Enumerate all extensions
    EE,
    /// Compute a single extension
    SE,
    /// Check credulous acceptance
    DC,
    /// Check skeptical acceptance
    DS,
    /// Compute the grounded, stable and preferred extension sets at once
    D3,
}

impl Query {
    /// Returns a short string representing the query.
    ///
    /// The string corresponds to the two letters query as defined in ICCMA competitions.
    pub fn to_short_str(&self) -> &str {
        match self {
            Query::EE => "EE",
            Query::SE => "SE",
            Query::DC => "DC",
            Query::DS => "DS",
            Query::D3 => "D3",
        }
    }

    /// Returns `true` iff the query needs an argument under decision.
    pub fn is_acceptance_query(&self) -> bool {
        matches!(self, Query::DC | Query::DS)
    }
}

impl TryFrom<&str> for Query {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "ee" => Ok(Query::EE),
            "se" => Ok(Query::SE),
            "dc" => Ok(Query::DC),
            "ds" => Ok(Query::DS),
            "d3" => Ok(Query::D3),
            _ => Err(anyhow!(r#"undefined query "{}""#, value)),
        }
    }
}

/// Reads a string depicting a problem with an XX-YY pattern.
///
/// This functions reads a problem string following the format in ICCMA competitions.
/// The string is split at the first hyphen found in it.
/// The substring before this hyphen is considered as the query, while the substring after it is considered as the semantics.
///
/// In case there is no hyphen, an error is returned.
/// In case there is more than one, then all the hyphens except the first are considered as part of the semantics.
pub fn read_problem_string(problem: &str) -> Result<(Query, Semantics)> {
    let context = || format!(r#"while parsing problem string "{}""#, problem);
    match problem.find('-') {
        Some(n) => {
            let query = Query::try_from(&problem[0..n]).with_context(context)?;
            let semantics = Semantics::try_from(&problem[1 + n..]).with_context(context)?;
            Ok((query, semantics))
        }
        None => Err(anyhow!("no hyphen in problem string")).with_context(context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_read_problem_ok() {
        assert_eq!(
            (Query::SE, Semantics::ST),
            read_problem_string("SE-ST").unwrap()
        );
        assert_eq!(
            (Query::EE, Semantics::SST),
            read_problem_string("ee-sst").unwrap()
        );
    }

    #[test]
    fn test_read_problem_unknown_query() {
        assert!(read_problem_string("foo-ST").is_err());
    }

    #[test]
    fn test_read_problem_unknown_semantics() {
        assert!(read_problem_string("SE-foo").is_err());
    }

    #[test]
    fn test_read_problem_no_hyphen() {
        assert!(read_problem_string("SEST").is_err());
    }

    #[test]
    fn test_short_str_round_trip() {
        for semantics in Semantics::iter() {
            assert_eq!(
                semantics,
                Semantics::try_from(semantics.to_short_str()).unwrap()
            );
        }
        for query in Query::iter() {
            assert_eq!(query, Query::try_from(query.to_short_str()).unwrap());
        }
    }

    #[test]
    fn test_acceptance_queries() {
        assert!(Query::DC.is_acceptance_query());
        assert!(Query::DS.is_acceptance_query());
        assert!(!Query::EE.is_acceptance_query());
        assert!(!Query::SE.is_acceptance_query());
        assert!(!Query::D3.is_acceptance_query());
    }
}
