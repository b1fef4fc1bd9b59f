use anyhow::Result;
use std::path::Path;
use tempfile::tempdir;
use word2bits::engine::conversion::{ConversionPipeline, ConversionRequest};
use word2bits::engine::packer::unpack;
use word2bits::{ConvertError, OutputFormat, ThresholdMode};

fn binary_input(words: &[(&str, Vec<f32>)]) -> Vec<u8> {
    let dim = words.first().map(|(_, v)| v.len()).unwrap_or(0);
    let mut data = format!("{} {}\n", words.len(), dim).into_bytes();
    for (word, vector) in words {
        data.extend_from_slice(word.as_bytes());
        data.push(b' ');
        for v in vector {
            data.extend_from_slice(&v.to_le_bytes());
        }
        data.push(b'\n');
    }
    data
}

fn convert(dir: &Path, input: &[u8], mode: ThresholdMode, format: OutputFormat) -> Result<Vec<u8>> {
    std::fs::write(dir.join("vectors.bin"), input)?;
    let request = ConversionRequest {
        input: dir.join("vectors.bin"),
        output: dir.join("vectors.out"),
        mode,
        format,
        show_progress: false,
    };
    ConversionPipeline::new(request).run()?;
    Ok(std::fs::read(dir.join("vectors.out"))?)
}

#[test]
fn test_three_words_binary_bucket() -> Result<()> {
    let dir = tempdir()?;
    let input = binary_input(&[
        ("the", vec![0.3, 0.8]),
        ("of", vec![1.2, 0.05]),
        ("and", vec![0.9, 0.6]),
    ]);

    let out = convert(dir.path(), &input, ThresholdMode::BinaryBucket, OutputFormat::Compressed)?;

    let header = b"3 2 1\n0.25\n0.75\n";
    assert!(out.starts_with(header));
    let rows = &out[header.len()..];
    assert_eq!(rows, b"the \x40\nof \x80\nand \xC0\n".as_slice());
    Ok(())
}

#[test]
fn test_signed_ternary_packs_sign_bits() -> Result<()> {
    let dir = tempdir()?;
    let input = binary_input(&[(
        "w",
        vec![0.4, -0.1, 0.0, -9.0, 3.0, 2.0, -1.0, 0.5, -0.2, 0.7],
    )]);

    let out = convert(dir.path(), &input, ThresholdMode::SignedTernary, OutputFormat::Compressed)?;

    let header = b"1 10 1\n-0.33333334\n0.33333334\n";
    assert!(out.starts_with(header));
    let row = &out[header.len() + 2..out.len() - 1];
    assert_eq!(row, &[0b1010_1101, 0b0100_0000]);
    assert_eq!(unpack(row, 1, 10), vec![1, 0, 1, 0, 1, 1, 0, 1, 0, 1]);
    Ok(())
}

#[test]
fn test_four_values_use_two_bits() -> Result<()> {
    let dir = tempdir()?;
    let input = binary_input(&[
        ("a", vec![-0.9, -0.1, 0.1, 0.9, 0.2]),
        ("b", vec![0.1, 0.1, 0.1, 0.1, -0.6]),
    ]);

    let out = convert(dir.path(), &input, ThresholdMode::BinaryBucket, OutputFormat::Compressed)?;

    let header = b"2 5 2\n-0.75\n-0.25\n0.25\n0.75\n";
    assert!(out.starts_with(header));
    let rows = &out[header.len()..];
    // each row: token, space, ceil(5 / 4) = 2 packed bytes, newline
    assert_eq!(rows.len(), 2 * (1 + 1 + 2 + 1));
    assert_eq!(&rows[2..4], &[0b00_01_10_11, 0b10_00_00_00]);
    assert_eq!(&rows[7..9], &[0b10_10_10_10, 0b00_00_00_00]);
    Ok(())
}

#[test]
fn test_five_distinct_values_fail() -> Result<()> {
    let dir = tempdir()?;
    let input = binary_input(&[("w", vec![0.1, 0.2, 0.3, 0.4, 0.5])]);

    let err =
        convert(dir.path(), &input, ThresholdMode::None, OutputFormat::Compressed).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConvertError>(),
        Some(ConvertError::UnsupportedCardinality { distinct: 5, bits: 3 })
    ));
    assert!(!dir.path().join("vectors.out").exists());
    Ok(())
}

#[test]
fn test_malformed_header_is_format_error() -> Result<()> {
    let dir = tempdir()?;
    let err =
        convert(dir.path(), b"three two\n", ThresholdMode::None, OutputFormat::Text).unwrap_err();
    assert!(matches!(err.downcast_ref::<ConvertError>(), Some(ConvertError::Format(_))));
    Ok(())
}

#[test]
fn test_duplicate_tokens_collapse() -> Result<()> {
    let dir = tempdir()?;
    let input = binary_input(&[
        ("dup", vec![-1.0]),
        ("other", vec![1.0]),
        ("dup", vec![1.0]),
    ]);

    let out = convert(dir.path(), &input, ThresholdMode::None, OutputFormat::Text)?;
    assert_eq!(out, b"2 1\ndup 1\nother 1\n".to_vec());
    Ok(())
}

fn dir_entries(dir: &Path) -> Result<Vec<String>> {
    let mut names = std::fs::read_dir(dir)?
        .map(|entry| -> Result<String> {
            Ok(entry?.file_name().to_string_lossy().into_owned())
        })
        .collect::<Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

#[test]
fn test_failed_conversions_leave_only_input() -> Result<()> {
    let cases: [(&[u8], OutputFormat); 4] = [
        (b"2 4\nw \x00\x00", OutputFormat::Compressed),
        (b"1000000000000000 1\n", OutputFormat::Text),
        (b"1 4611686018427387904\nw ", OutputFormat::Binary),
        (b"not a header\n", OutputFormat::Compressed),
    ];

    for (input, format) in cases {
        let dir = tempdir()?;
        let err = convert(dir.path(), input, ThresholdMode::None, format).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<ConvertError>(),
                Some(ConvertError::Truncation { .. }) | Some(ConvertError::Format(_))
            ),
            "{:#}",
            err
        );
        assert_eq!(dir_entries(dir.path())?, vec!["vectors.bin".to_string()]);
    }
    Ok(())
}

#[test]
fn test_huge_declared_vocabulary_is_truncation() -> Result<()> {
    let dir = tempdir()?;
    let mut input = b"1000000000000000 2\n".to_vec();
    input.extend(b"only ");
    input.extend(0.5f32.to_le_bytes());
    input.extend(0.25f32.to_le_bytes());
    input.push(b'\n');

    let err = convert(dir.path(), &input, ThresholdMode::None, OutputFormat::Text).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConvertError>(),
        Some(ConvertError::Truncation { word_index: 1, expected: 9, available: 0 })
    ));
    assert!(!dir.path().join("vectors.out").exists());
    Ok(())
}
